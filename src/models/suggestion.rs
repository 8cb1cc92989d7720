use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SeasonContext;

/// A scored recipe produced by the candidate scorer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateScore {
    pub recipe_id: Uuid,
    pub title: String,
    pub score: f64,
    pub reason: String,
    pub warning: Option<String>,
    pub title_image_url: Option<String>,
}

/// One pick returned by the AI provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestion {
    pub recipe_id: Uuid,
    pub reason: String,
}

/// A suggestion as shown to the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankedSuggestion {
    pub recipe_id: Uuid,
    pub title: String,
    pub reason: String,
    pub warning: Option<String>,
    pub title_image_url: Option<String>,
}

impl From<&CandidateScore> for RankedSuggestion {
    fn from(candidate: &CandidateScore) -> Self {
        Self {
            recipe_id: candidate.recipe_id,
            title: candidate.title.clone(),
            reason: candidate.reason.clone(),
            warning: candidate.warning.clone(),
            title_image_url: candidate.title_image_url.clone(),
        }
    }
}

/// Result of the prompt-guided flow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealAssistantResponse {
    pub suggestions: Vec<RankedSuggestion>,
    #[serde(flatten)]
    pub season: SeasonContext,
    pub used_ai: bool,
    pub warnings: Vec<String>,
}
