use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::{
    cached,
    config::Config,
    db::{CacheKey, CacheStore},
    error::{AppError, AppResult},
    models::{
        AiSuggestion, CandidateScore, FeedRequest, MealAssistantRequest, MealAssistantResponse,
        RankedSuggestion, SeasonContext,
    },
    services::{
        ai_ranker::{AiRanker, MAX_AI_CANDIDATES},
        audit::AiAuditLog,
        credentials::CredentialDecryptor,
        merger::{merge_suggestions, MAX_SUGGESTIONS},
        providers::adapter_for,
        scoring::CandidateScorer,
        season::resolve_season,
        transport::HttpTransport,
    },
};

pub const AI_NOT_CONFIGURED_WARNING: &str =
    "AI assistant is not configured for this household; showing standard suggestions.";
pub const AI_CREDENTIALS_WARNING: &str =
    "AI credentials could not be read; showing standard suggestions.";
pub const AI_UNAVAILABLE_WARNING: &str =
    "AI ranking was unavailable; showing standard suggestions.";
pub const AI_NO_MATCH_WARNING: &str =
    "AI suggestions did not match any eligible recipe; showing standard suggestions.";
pub const NO_ELIGIBLE_RECIPES_WARNING: &str =
    "No eligible recipes found after applying allergen filters.";

/// Entry point for both recommendation flows
///
/// Holds no per-household state: AI settings, recipes and preferences arrive
/// with each request.
#[derive(Clone)]
pub struct MealAssistant {
    config: Config,
    ai_ranker: AiRanker,
    decryptor: Option<Arc<dyn CredentialDecryptor>>,
    cache: Option<Arc<dyn CacheStore>>,
}

impl MealAssistant {
    pub fn new(
        config: Config,
        transport: Arc<dyn HttpTransport>,
        audit_log: Arc<dyn AiAuditLog>,
    ) -> Self {
        let ai_ranker = AiRanker::new(transport, audit_log, config.ai_timeout());

        Self {
            config,
            ai_ranker,
            decryptor: None,
            cache: None,
        }
    }

    /// Enables AI ranking for households with an encrypted credential
    pub fn with_decryptor(mut self, decryptor: Arc<dyn CredentialDecryptor>) -> Self {
        self.decryptor = Some(decryptor);
        self
    }

    /// Enables read-through caching of feed rankings
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// "Recommended for you" feed (profile A)
    ///
    /// Cached per user for `feed_cache_ttl_secs`. Concurrent misses for the
    /// same user both compute and the last write wins.
    pub async fn recommend_feed<R: Rng + ?Sized>(
        &self,
        request: &FeedRequest,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> AppResult<Vec<RankedSuggestion>> {
        let Some(cache) = &self.cache else {
            return Ok(self.rank_feed(request, now, rng));
        };

        let key = CacheKey::FeedRanking(request.user_id);
        cached!(cache, key, self.config.feed_cache_ttl_secs, async {
            Ok::<_, AppError>(self.rank_feed(request, now, rng))
        })
    }

    fn rank_feed<R: Rng + ?Sized>(
        &self,
        request: &FeedRequest,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<RankedSuggestion> {
        let max_results = request.max_results.clamp(1, MAX_SUGGESTIONS);
        let scorer = CandidateScorer::new(&request.recipes, &request.preferences);

        let suggestions: Vec<RankedSuggestion> = scorer
            .feed_ranking(&request.cook_stats, now, max_results, rng)
            .iter()
            .map(RankedSuggestion::from)
            .collect();

        tracing::info!(
            household_id = %request.household_id,
            user_id = %request.user_id,
            suggestions = suggestions.len(),
            "Feed recommendations computed"
        );

        suggestions
    }

    /// Prompt-guided suggestions (profile B), optionally re-ranked by AI
    ///
    /// Never fails: every AI problem degrades to the deterministic top three
    /// plus a warning.
    pub async fn suggest_for_prompt(
        &self,
        request: &MealAssistantRequest,
        now: DateTime<Utc>,
    ) -> MealAssistantResponse {
        let season = resolve_season(request.latitude, now);
        let scorer = CandidateScorer::new(&request.recipes, &request.preferences);
        let candidates = scorer.prompt_ranking(&request.prompt, season.season, MAX_AI_CANDIDATES);

        if candidates.is_empty() {
            tracing::info!(
                household_id = %request.household_id,
                recipes = request.recipes.len(),
                "No eligible recipes after allergen filtering"
            );
            return MealAssistantResponse {
                suggestions: Vec::new(),
                season,
                used_ai: false,
                warnings: vec![NO_ELIGIBLE_RECIPES_WARNING.to_string()],
            };
        }

        let mut warnings = Vec::new();
        let fallback = &candidates[..candidates.len().min(MAX_SUGGESTIONS)];
        let ai_suggestions = self
            .try_ai_ranking(request, &candidates, &season, &mut warnings)
            .await;

        let outcome = merge_suggestions(&candidates, ai_suggestions.as_deref(), fallback);

        if ai_suggestions.is_some() && !outcome.used_ai {
            warnings.push(AI_NO_MATCH_WARNING.to_string());
        }

        tracing::info!(
            household_id = %request.household_id,
            user_id = %request.user_id,
            season = %season.season,
            used_ai = outcome.used_ai,
            suggestions = outcome.suggestions.len(),
            "Meal assistant suggestions computed"
        );

        MealAssistantResponse {
            suggestions: outcome.suggestions,
            season,
            used_ai: outcome.used_ai,
            warnings,
        }
    }

    /// Runs the AI step when the household allows it
    ///
    /// `None` means AI was skipped or failed; the reason is pushed to `warnings`.
    async fn try_ai_ranking(
        &self,
        request: &MealAssistantRequest,
        candidates: &[CandidateScore],
        season: &SeasonContext,
        warnings: &mut Vec<String>,
    ) -> Option<Vec<AiSuggestion>> {
        let Some(settings) = request.ai_settings.configured() else {
            warnings.push(AI_NOT_CONFIGURED_WARNING.to_string());
            return None;
        };

        let api_key = match &self.decryptor {
            Some(decryptor) => decryptor.decrypt(settings.encrypted_api_key),
            None => Err(AppError::Credential(
                "No credential key configured".to_string(),
            )),
        };
        let api_key = match api_key {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(
                    household_id = %request.household_id,
                    error = %e,
                    "Could not decrypt AI credential"
                );
                warnings.push(AI_CREDENTIALS_WARNING.to_string());
                return None;
            }
        };

        let adapter = adapter_for(settings.provider, &self.config);
        match self
            .ai_ranker
            .rank(
                adapter.as_ref(),
                settings.model,
                &api_key,
                candidates,
                &request.prompt,
                season,
            )
            .await
        {
            Ok(suggestions) => Some(suggestions),
            Err(e) => {
                tracing::warn!(
                    household_id = %request.household_id,
                    provider = %settings.provider,
                    error = %e,
                    "AI ranking failed, using deterministic suggestions"
                );
                warnings.push(AI_UNAVAILABLE_WARNING.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::redis::cache::MockCacheStore;
    use crate::models::{Recipe, UserPreferenceSet};
    use crate::services::audit::MockAiAuditLog;
    use crate::services::transport::MockHttpTransport;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn assistant() -> MealAssistant {
        MealAssistant::new(
            Config::default(),
            Arc::new(MockHttpTransport::new()),
            Arc::new(MockAiAuditLog::new()),
        )
    }

    fn january() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0).unwrap()
    }

    fn feed_request(recipes: Vec<Recipe>, max_results: usize) -> FeedRequest {
        FeedRequest {
            household_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            recipes,
            preferences: UserPreferenceSet::default(),
            cook_stats: HashMap::new(),
            max_results,
        }
    }

    fn prompt_request(recipes: Vec<Recipe>, prompt: &str) -> MealAssistantRequest {
        MealAssistantRequest {
            household_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            prompt: prompt.to_string(),
            recipes,
            preferences: UserPreferenceSet::default(),
            latitude: Some(47.0),
            ai_settings: Default::default(),
        }
    }

    fn pantry() -> Vec<Recipe> {
        vec![
            Recipe::new("Beef Stew", &["beef", "carrot"], &["stew", "french"]),
            Recipe::new("Greek Salad", &["cucumber", "feta"], &["salad", "greek"]),
            Recipe::new("Chicken Curry", &["chicken", "curry paste"], &["indian"]),
            Recipe::new("Mushroom Risotto", &["rice", "mushroom"], &["italian"]),
        ]
    }

    #[tokio::test]
    async fn test_feed_clamps_max_results() {
        let mut rng = StdRng::seed_from_u64(7);
        let request = feed_request(pantry(), 10);
        let feed = assistant()
            .recommend_feed(&request, january(), &mut rng)
            .await
            .unwrap();
        assert_eq!(feed.len(), 3);

        let request = feed_request(pantry(), 0);
        let feed = assistant()
            .recommend_feed(&request, january(), &mut rng)
            .await
            .unwrap();
        assert_eq!(feed.len(), 1);
    }

    #[tokio::test]
    async fn test_feed_cache_hit_skips_ranking() {
        let cached = vec![RankedSuggestion {
            recipe_id: Uuid::new_v4(),
            title: "Cached Lasagna".to_string(),
            reason: "Never cooked before".to_string(),
            warning: None,
            title_image_url: None,
        }];
        let json = serde_json::to_string(&cached).unwrap();
        let request = feed_request(pantry(), 3);
        let expected_key = CacheKey::FeedRanking(request.user_id);

        let mut cache = MockCacheStore::new();
        cache
            .expect_get_raw()
            .withf(move |key| *key == expected_key)
            .times(1)
            .returning(move |_| Ok(Some(json.clone())));
        cache.expect_set_raw_in_background().never();

        let assistant = assistant().with_cache(Arc::new(cache));
        let mut rng = StdRng::seed_from_u64(1);
        let feed = assistant
            .recommend_feed(&request, january(), &mut rng)
            .await
            .unwrap();

        assert_eq!(feed, cached);
    }

    #[tokio::test]
    async fn test_feed_cache_miss_writes_result() {
        let request = feed_request(pantry(), 2);

        let mut cache = MockCacheStore::new();
        cache.expect_get_raw().times(1).returning(|_| Ok(None));
        cache
            .expect_set_raw_in_background()
            .withf(|key, value, ttl| {
                matches!(key, CacheKey::FeedRanking(_)) && value.contains("recipeId") && *ttl == 300
            })
            .times(1)
            .returning(|_, _, _| ());

        let assistant = assistant().with_cache(Arc::new(cache));
        let mut rng = StdRng::seed_from_u64(1);
        let feed = assistant
            .recommend_feed(&request, january(), &mut rng)
            .await
            .unwrap();

        assert_eq!(feed.len(), 2);
    }

    #[tokio::test]
    async fn test_feed_cache_read_error_degrades_to_compute() {
        let request = feed_request(pantry(), 3);

        let mut cache = MockCacheStore::new();
        cache
            .expect_get_raw()
            .returning(|_| Err(AppError::Internal("connection reset".to_string())));
        cache
            .expect_set_raw_in_background()
            .times(1)
            .returning(|_, _, _| ());

        let assistant = assistant().with_cache(Arc::new(cache));
        let mut rng = StdRng::seed_from_u64(3);
        let feed = assistant
            .recommend_feed(&request, january(), &mut rng)
            .await
            .unwrap();

        assert_eq!(feed.len(), 3);
    }

    #[tokio::test]
    async fn test_prompt_without_ai_settings_is_deterministic() {
        let request = prompt_request(pantry(), "hearty stew tonight");
        let response = assistant().suggest_for_prompt(&request, january()).await;

        assert!(!response.used_ai);
        assert_eq!(response.warnings, vec![AI_NOT_CONFIGURED_WARNING.to_string()]);
        assert_eq!(response.suggestions.len(), 3);
        assert_eq!(response.suggestions[0].title, "Beef Stew");
        assert_eq!(response.season.month, "January");
    }

    #[tokio::test]
    async fn test_prompt_with_settings_but_no_decryptor() {
        let mut request = prompt_request(pantry(), "");
        request.ai_settings = crate::models::AiSettings {
            provider: Some(crate::models::AiProvider::OpenAi),
            model: Some("gpt-4o-mini".to_string()),
            encrypted_api_key: Some("ciphertext".to_string()),
        };

        let response = assistant().suggest_for_prompt(&request, january()).await;
        assert!(!response.used_ai);
        assert_eq!(response.warnings, vec![AI_CREDENTIALS_WARNING.to_string()]);
        assert_eq!(response.suggestions.len(), 3);
    }

    #[tokio::test]
    async fn test_prompt_with_everything_excluded() {
        let mut request = prompt_request(vec![Recipe::new("Satay", &["peanut butter"], &[])], "");
        request.preferences.allergens = vec!["Peanut".to_string()];

        let response = assistant().suggest_for_prompt(&request, january()).await;
        assert!(response.suggestions.is_empty());
        assert_eq!(response.warnings, vec![NO_ELIGIBLE_RECIPES_WARNING.to_string()]);
    }
}
