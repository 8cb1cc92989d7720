use std::{collections::HashSet, sync::Arc, time::Duration};

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{AiSuggestion, CandidateScore, Season, SeasonContext},
    services::{
        audit::{AiAuditLog, AiCallRecord},
        extraction::{extract_assistant_text, extract_json_object},
        providers::AiProviderAdapter,
        transport::HttpTransport,
    },
};

/// Upper bound on candidates exposed to the provider
pub const MAX_AI_CANDIDATES: usize = 20;

/// What the provider sees of a recipe: id and title only
#[derive(Debug, Serialize)]
struct CandidateSummary<'a> {
    id: Uuid,
    title: &'a str,
}

/// Re-ranks the deterministic candidate pool with an AI provider
///
/// One provider call per invocation, no retries. Every attempt is reported to
/// the audit log, whatever the outcome.
#[derive(Clone)]
pub struct AiRanker {
    transport: Arc<dyn HttpTransport>,
    audit_log: Arc<dyn AiAuditLog>,
    timeout: Duration,
}

impl AiRanker {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        audit_log: Arc<dyn AiAuditLog>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            audit_log,
            timeout,
        }
    }

    /// Asks the provider to pick from `candidates`
    ///
    /// Returns only suggestions whose id is among the candidates sent. An `Err`
    /// means the provider call itself failed (transport error, non-2xx or
    /// timeout); unparseable output is `Ok` with no suggestions.
    pub async fn rank(
        &self,
        adapter: &dyn AiProviderAdapter,
        model: &str,
        api_key: &str,
        candidates: &[CandidateScore],
        prompt: &str,
        season: &SeasonContext,
    ) -> AppResult<Vec<AiSuggestion>> {
        let candidates = &candidates[..candidates.len().min(MAX_AI_CANDIDATES)];
        let instructions = build_instructions(candidates, prompt, season)?;
        let request = adapter.build_request(model, api_key, &instructions)?;
        let record = AiCallRecord::new(adapter.provider(), model, request.body.clone());

        tracing::info!(
            provider = %adapter.provider(),
            model = %model,
            candidates = candidates.len(),
            "Requesting AI meal ranking"
        );

        let response = match tokio::time::timeout(self.timeout, self.transport.post_json(&request))
            .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                self.audit_log
                    .record(record.failed(None, None, e.to_string()))
                    .await;
                return Err(e);
            }
            Err(_) => {
                let error = AppError::Timeout(self.timeout.as_secs());
                self.audit_log
                    .record(record.failed(None, None, error.to_string()))
                    .await;
                return Err(error);
            }
        };

        if !response.is_success() {
            let message = format!(
                "{} returned status {}",
                adapter.provider(),
                response.status
            );
            self.audit_log
                .record(record.failed(
                    Some(response.status),
                    Some(response.body.clone()),
                    message.clone(),
                ))
                .await;
            return Err(AppError::ExternalApi(message));
        }

        self.audit_log
            .record(record.succeeded(response.status, response.body.clone()))
            .await;

        let parsed = parse_suggestions(&response.body);
        let allowed: HashSet<Uuid> = candidates.iter().map(|c| c.recipe_id).collect();
        let total = parsed.len();

        let suggestions: Vec<AiSuggestion> = parsed
            .into_iter()
            .filter(|suggestion| allowed.contains(&suggestion.recipe_id))
            .collect();

        if suggestions.len() < total {
            tracing::warn!(
                dropped = total - suggestions.len(),
                "AI returned recipe ids outside the candidate set"
            );
        }

        Ok(suggestions)
    }
}

/// Builds the user message sent to the provider
fn build_instructions(
    candidates: &[CandidateScore],
    prompt: &str,
    season: &SeasonContext,
) -> AppResult<String> {
    let summaries: Vec<CandidateSummary<'_>> = candidates
        .iter()
        .map(|c| CandidateSummary {
            id: c.recipe_id,
            title: &c.title,
        })
        .collect();
    let candidates_json = serde_json::to_string(&summaries)?;

    let request = if prompt.trim().is_empty() {
        "(no specific request)"
    } else {
        prompt.trim()
    };

    let season_line = if season.has_location && season.season != Season::Unknown {
        format!(
            "Current season: {} ({} hemisphere), month: {}.",
            season.season, season.hemisphere, season.month
        )
    } else {
        format!("Current season: unknown, month: {}.", season.month)
    };

    Ok(format!(
        "User request: {request}\n\
         {season_line}\n\
         Candidate recipes (JSON): {candidates_json}\n\n\
         Choose exactly 3 unique recipes, using only ids from the candidate list. \
         Prefer seasonally appropriate dishes unless the request asks otherwise.\n\
         Respond with JSON only, in exactly this shape: \
         {{\"suggestions\":[{{\"recipeId\":\"<id>\",\"reason\":\"<short text>\"}}]}}"
    ))
}

/// Reads `suggestions` out of a provider response body
///
/// Anything malformed yields an empty list. Entries without a UUID `recipeId`
/// are skipped; duplicates keep their first position.
fn parse_suggestions(body: &str) -> Vec<AiSuggestion> {
    let Ok(response) = serde_json::from_str::<Value>(body) else {
        tracing::warn!("AI response body is not JSON");
        return Vec::new();
    };

    let Some(text) = extract_assistant_text(&response) else {
        tracing::warn!("AI response contained no assistant text");
        return Vec::new();
    };

    let Some(object) = extract_json_object(&text) else {
        tracing::warn!("AI response contained no JSON object");
        return Vec::new();
    };

    let Some(entries) = object.get("suggestions").and_then(Value::as_array) else {
        tracing::warn!("AI response has no suggestions array");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    entries
        .iter()
        .filter_map(|entry| {
            let recipe_id = entry
                .get("recipeId")
                .and_then(Value::as_str)
                .and_then(|id| Uuid::parse_str(id.trim()).ok())?;
            let reason = entry
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Some(AiSuggestion { recipe_id, reason })
        })
        .filter(|suggestion| seen.insert(suggestion.recipe_id))
        .collect()
}
