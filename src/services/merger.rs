use std::collections::HashSet;

use crate::models::{AiSuggestion, CandidateScore, RankedSuggestion};

/// Size of every suggestion list shown to the user
pub const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub suggestions: Vec<RankedSuggestion>,
    /// True when at least one AI pick made it into `suggestions`
    pub used_ai: bool,
}

/// Combines AI picks with the deterministic fallback
///
/// AI picks come first, in the order returned, as long as they resolve to a
/// candidate. Remaining slots are filled from `fallback` in order, skipping
/// ids already selected.
pub fn merge_suggestions(
    candidates: &[CandidateScore],
    ai_suggestions: Option<&[AiSuggestion]>,
    fallback: &[CandidateScore],
) -> MergeOutcome {
    let mut selected: Vec<RankedSuggestion> = Vec::with_capacity(MAX_SUGGESTIONS);
    let mut seen = HashSet::new();

    for suggestion in ai_suggestions.unwrap_or_default() {
        if selected.len() >= MAX_SUGGESTIONS {
            break;
        }

        let Some(candidate) = candidates
            .iter()
            .find(|c| c.recipe_id == suggestion.recipe_id)
        else {
            continue;
        };

        if !seen.insert(candidate.recipe_id) {
            continue;
        }

        let mut ranked = RankedSuggestion::from(candidate);
        if !suggestion.reason.trim().is_empty() {
            ranked.reason = suggestion.reason.clone();
        }
        selected.push(ranked);
    }

    let used_ai = !selected.is_empty();

    for candidate in fallback {
        if selected.len() >= MAX_SUGGESTIONS {
            break;
        }
        if seen.insert(candidate.recipe_id) {
            selected.push(RankedSuggestion::from(candidate));
        }
    }

    MergeOutcome {
        suggestions: selected,
        used_ai,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn candidates(n: usize) -> Vec<CandidateScore> {
        (0..n)
            .map(|i| CandidateScore {
                recipe_id: Uuid::new_v4(),
                title: format!("Recipe {}", i),
                score: 100.0 - i as f64,
                reason: format!("Deterministic reason {}", i),
                warning: (i == 4).then(|| "Contains disliked ingredient(s): onion".to_string()),
                title_image_url: Some(format!("https://img/{}.jpg", i)),
            })
            .collect()
    }

    fn pick(candidate: &CandidateScore, reason: &str) -> AiSuggestion {
        AiSuggestion {
            recipe_id: candidate.recipe_id,
            reason: reason.to_string(),
        }
    }

    fn ids(suggestions: &[RankedSuggestion]) -> Vec<Uuid> {
        suggestions.iter().map(|s| s.recipe_id).collect()
    }

    #[test]
    fn test_no_ai_returns_fallback_verbatim() {
        let pool = candidates(6);
        let fallback = &pool[..3];

        let outcome = merge_suggestions(&pool, None, fallback);
        assert!(!outcome.used_ai);
        let expected: Vec<RankedSuggestion> = fallback.iter().map(RankedSuggestion::from).collect();
        assert_eq!(outcome.suggestions, expected);

        let empty = merge_suggestions(&pool, Some(&[]), fallback);
        assert_eq!(empty, outcome);
    }

    #[test]
    fn test_ai_picks_lead_and_carry_candidate_fields() {
        let pool = candidates(6);
        let ai = vec![pick(&pool[4], "Hearty"), pick(&pool[5], "  ")];

        let outcome = merge_suggestions(&pool, Some(&ai), &pool[..3]);
        assert!(outcome.used_ai);
        assert_eq!(
            ids(&outcome.suggestions),
            vec![pool[4].recipe_id, pool[5].recipe_id, pool[0].recipe_id]
        );
        assert_eq!(outcome.suggestions[0].reason, "Hearty");
        assert_eq!(outcome.suggestions[0].warning, pool[4].warning);
        assert_eq!(outcome.suggestions[0].title_image_url, pool[4].title_image_url);
        // blank AI reason falls back to the candidate's
        assert_eq!(outcome.suggestions[1].reason, pool[5].reason);
    }

    #[test]
    fn test_unknown_and_duplicate_picks_are_skipped() {
        let pool = candidates(5);
        let ai = vec![
            AiSuggestion {
                recipe_id: Uuid::new_v4(),
                reason: "hallucinated".to_string(),
            },
            pick(&pool[1], "first"),
            pick(&pool[1], "second"),
        ];

        let outcome = merge_suggestions(&pool, Some(&ai), &pool[..3]);
        assert!(outcome.used_ai);
        assert_eq!(
            ids(&outcome.suggestions),
            vec![pool[1].recipe_id, pool[0].recipe_id, pool[2].recipe_id]
        );
        assert_eq!(outcome.suggestions[0].reason, "first");
    }

    #[test]
    fn test_only_unknown_picks_is_not_ai_assisted() {
        let pool = candidates(4);
        let ai = vec![AiSuggestion {
            recipe_id: Uuid::new_v4(),
            reason: "nope".to_string(),
        }];

        let outcome = merge_suggestions(&pool, Some(&ai), &pool[..3]);
        assert!(!outcome.used_ai);
        let fallback_only = merge_suggestions(&pool, None, &pool[..3]);
        assert_eq!(ids(&outcome.suggestions), ids(&fallback_only.suggestions));
    }

    #[test]
    fn test_output_is_capped() {
        let pool = candidates(6);
        let ai: Vec<AiSuggestion> = pool.iter().map(|c| pick(c, "ai")).collect();

        let outcome = merge_suggestions(&pool, Some(&ai), &pool[..3]);
        assert_eq!(outcome.suggestions.len(), MAX_SUGGESTIONS);
        assert!(outcome.suggestions.iter().all(|s| s.reason == "ai"));
    }

    #[test]
    fn test_small_pool() {
        let pool = candidates(2);
        let outcome = merge_suggestions(&pool, None, &pool);
        assert_eq!(outcome.suggestions.len(), 2);
    }
}
