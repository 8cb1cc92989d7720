use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::models::{CandidateScore, CookStat, Recipe, Season, UserPreferenceSet};

const BASE_SCORE: f64 = 100.0;
const STALE_AFTER_DAYS: i64 = 14;
const MIN_TOKEN_LEN: usize = 3;
const MAX_WARNING_INGREDIENTS: usize = 2;
const PROMPT_SEPARATORS: &[char] = &[',', '.', ';', ':', '/', '\\', '!', '?', '-', '_'];
const WINTER_MISMATCH_TAGS: &[&str] = &["bbq", "grill", "salad"];
const SUMMER_MISMATCH_TAGS: &[&str] = &["stew", "soup", "roast"];

/// Weight table for one ranking profile
///
/// A zero weight disables the signal for that profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub disliked_match: f64,
    pub prompt_ingredient_match: f64,
    pub favorite_cuisine_match: f64,
    pub prompt_tag_match: f64,
    pub never_cooked: f64,
    pub stale_cook: f64,
    pub winter_mismatch: f64,
    pub summer_mismatch: f64,
}

/// Profile A: the "recommended for you" feed
pub const FEED_WEIGHTS: ScoringWeights = ScoringWeights {
    disliked_match: -10.0,
    prompt_ingredient_match: 0.0,
    favorite_cuisine_match: 20.0,
    prompt_tag_match: 0.0,
    never_cooked: 30.0,
    stale_cook: 15.0,
    winter_mismatch: 0.0,
    summer_mismatch: 0.0,
};

/// Profile B: free-text meal requests
pub const PROMPT_WEIGHTS: ScoringWeights = ScoringWeights {
    disliked_match: -15.0,
    prompt_ingredient_match: 9.0,
    favorite_cuisine_match: 18.0,
    prompt_tag_match: 6.0,
    never_cooked: 0.0,
    stale_cook: 0.0,
    winter_mismatch: -10.0,
    summer_mismatch: -8.0,
};

/// Splits a free-text request into lower-cased keywords of 3+ characters
pub fn tokenize_prompt(prompt: &str) -> BTreeSet<String> {
    prompt
        .split(|c: char| c.is_whitespace() || PROMPT_SEPARATORS.contains(&c))
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() >= MIN_TOKEN_LEN)
        .collect()
}

/// Scores a household's recipes against one user's preferences
///
/// Recipes with an allergen-matched ingredient are dropped before scoring and
/// can never be returned by either profile.
pub struct CandidateScorer<'a> {
    recipes: &'a [Recipe],
    allergens: Vec<String>,
    dislikes: Vec<String>,
    cuisines: Vec<String>,
}

/// Signals collected for a single recipe
#[derive(Debug, Default)]
struct RecipeSignals {
    score: f64,
    disliked_ingredients: Vec<String>,
    matched_tokens: BTreeSet<String>,
    matched_cuisine_tags: Vec<String>,
    never_cooked: bool,
    stale: bool,
}

impl<'a> CandidateScorer<'a> {
    pub fn new(recipes: &'a [Recipe], preferences: &UserPreferenceSet) -> Self {
        Self {
            recipes,
            allergens: preferences.normalized_allergens(),
            dislikes: preferences.normalized_dislikes(),
            cuisines: preferences.normalized_cuisines(),
        }
    }

    /// Recipes that survive the allergen hard-exclude, in input order
    pub fn eligible_recipes(&self) -> Vec<&'a Recipe> {
        self.recipes
            .iter()
            .filter(|recipe| !self.contains_allergen(recipe))
            .collect()
    }

    fn contains_allergen(&self, recipe: &Recipe) -> bool {
        if self.allergens.is_empty() {
            return false;
        }
        recipe.ingredients.iter().any(|ingredient| {
            let name = ingredient.name.to_lowercase();
            self.allergens.iter().any(|allergen| name.contains(allergen))
        })
    }

    /// Profile A ranking with a random tie-break drawn from `rng`
    pub fn feed_ranking<R: Rng + ?Sized>(
        &self,
        cook_stats: &HashMap<Uuid, CookStat>,
        now: DateTime<Utc>,
        max_results: usize,
        rng: &mut R,
    ) -> Vec<CandidateScore> {
        let no_tokens = BTreeSet::new();

        let mut scored: Vec<CandidateScore> = self
            .eligible_recipes()
            .into_iter()
            .map(|recipe| {
                let mut signals = self.collect_signals(recipe, &no_tokens, &FEED_WEIGHTS);

                match cook_stats.get(&recipe.id).and_then(|stat| stat.last_cooked_at) {
                    None => {
                        signals.never_cooked = true;
                        signals.score += FEED_WEIGHTS.never_cooked;
                    }
                    Some(last_cooked) if now - last_cooked > Duration::days(STALE_AFTER_DAYS) => {
                        signals.stale = true;
                        signals.score += FEED_WEIGHTS.stale_cook;
                    }
                    Some(_) => {}
                }

                CandidateScore {
                    recipe_id: recipe.id,
                    title: recipe.title.clone(),
                    score: signals.score,
                    reason: feed_reason(&signals),
                    warning: None,
                    title_image_url: recipe.title_image_url(),
                }
            })
            .collect();

        // Stable sort after a shuffle leaves equal scores in random order
        scored.shuffle(rng);
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(max_results.max(1));

        tracing::debug!(
            candidates = scored.len(),
            total_recipes = self.recipes.len(),
            "Feed ranking computed"
        );

        scored
    }

    /// Profile B ranking, deterministic for identical inputs
    pub fn prompt_ranking(
        &self,
        prompt: &str,
        season: Season,
        max_results: usize,
    ) -> Vec<CandidateScore> {
        let tokens = tokenize_prompt(prompt);

        let mut scored: Vec<CandidateScore> = self
            .eligible_recipes()
            .into_iter()
            .map(|recipe| {
                let mut signals = self.collect_signals(recipe, &tokens, &PROMPT_WEIGHTS);
                signals.score += season_penalty(recipe, season);

                CandidateScore {
                    recipe_id: recipe.id,
                    title: recipe.title.clone(),
                    score: signals.score,
                    reason: prompt_reason(&signals),
                    warning: dislike_warning(&signals.disliked_ingredients),
                    title_image_url: recipe.title_image_url(),
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
                .then_with(|| a.recipe_id.cmp(&b.recipe_id))
        });
        scored.truncate(max_results.max(1));

        tracing::debug!(
            candidates = scored.len(),
            tokens = tokens.len(),
            season = %season,
            "Prompt ranking computed"
        );

        scored
    }

    /// Ingredient and tag signals shared by both profiles
    fn collect_signals(
        &self,
        recipe: &Recipe,
        tokens: &BTreeSet<String>,
        weights: &ScoringWeights,
    ) -> RecipeSignals {
        let mut signals = RecipeSignals {
            score: BASE_SCORE,
            ..RecipeSignals::default()
        };

        for ingredient in &recipe.ingredients {
            let name = ingredient.name.to_lowercase();

            let dislike_hits = self.dislikes.iter().filter(|term| name.contains(*term)).count();
            if dislike_hits > 0 {
                signals.score += weights.disliked_match * dislike_hits as f64;
                signals.disliked_ingredients.push(ingredient.name.clone());
            }

            for token in tokens.iter().filter(|token| name.contains(token.as_str())) {
                signals.score += weights.prompt_ingredient_match;
                signals.matched_tokens.insert(token.clone());
            }
        }

        for tag in &recipe.tags {
            let tag_lower = tag.to_lowercase();

            let cuisine_hits = self
                .cuisines
                .iter()
                .filter(|cuisine| tag_lower.contains(cuisine.as_str()))
                .count();
            if cuisine_hits > 0 {
                signals.score += weights.favorite_cuisine_match * cuisine_hits as f64;
                signals.matched_cuisine_tags.push(tag.clone());
            }

            for token in tokens.iter().filter(|token| tag_lower.contains(token.as_str())) {
                signals.score += weights.prompt_tag_match;
                signals.matched_tokens.insert(token.clone());
            }
        }

        signals
    }
}

/// Penalty for recipes that clash with the current season, applied once
fn season_penalty(recipe: &Recipe, season: Season) -> f64 {
    let (mismatch_tags, penalty) = match season {
        Season::Winter => (WINTER_MISMATCH_TAGS, PROMPT_WEIGHTS.winter_mismatch),
        Season::Summer => (SUMMER_MISMATCH_TAGS, PROMPT_WEIGHTS.summer_mismatch),
        _ => return 0.0,
    };

    let clashes = recipe.tags.iter().any(|tag| {
        let tag = tag.to_lowercase();
        mismatch_tags.iter().any(|mismatch| tag.contains(mismatch))
    });

    if clashes {
        penalty
    } else {
        0.0
    }
}

fn dislike_warning(disliked_ingredients: &[String]) -> Option<String> {
    let mut distinct: Vec<&str> = Vec::new();
    for name in disliked_ingredients {
        if distinct.len() == MAX_WARNING_INGREDIENTS {
            break;
        }
        let lowered = name.to_lowercase();
        if !distinct.iter().any(|seen| seen.to_lowercase() == lowered) {
            distinct.push(name);
        }
    }

    if distinct.is_empty() {
        None
    } else {
        Some(format!(
            "Contains disliked ingredient(s): {}",
            distinct.join(", ")
        ))
    }
}

fn cuisine_reason(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    let mut distinct: Vec<&str> = Vec::new();
    for tag in tags {
        if !distinct.contains(&tag.as_str()) {
            distinct.push(tag);
        }
    }
    Some(format!("Matches your favorite cuisines ({})", distinct.join(", ")))
}

fn feed_reason(signals: &RecipeSignals) -> String {
    let mut parts = Vec::new();
    if signals.never_cooked {
        parts.push("Never cooked before".to_string());
    }
    if signals.stale {
        parts.push("Not cooked in over two weeks".to_string());
    }
    parts.extend(cuisine_reason(&signals.matched_cuisine_tags));

    if parts.is_empty() {
        "Recommended from your household recipes".to_string()
    } else {
        parts.join("; ")
    }
}

fn prompt_reason(signals: &RecipeSignals) -> String {
    let mut parts = Vec::new();
    if !signals.matched_tokens.is_empty() {
        let tokens: Vec<&str> = signals.matched_tokens.iter().map(String::as_str).collect();
        parts.push(format!("Matches your request ({})", tokens.join(", ")));
    }
    parts.extend(cuisine_reason(&signals.matched_cuisine_tags));

    if parts.is_empty() {
        "Good match from your household recipes".to_string()
    } else {
        parts.join("; ")
    }
}
