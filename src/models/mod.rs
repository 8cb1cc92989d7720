use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt::Display};
use uuid::Uuid;

pub mod recipe;
pub mod suggestion;
pub mod user_preferences;

pub use recipe::{CookStat, Ingredient, Recipe, RecipeImage};
pub use suggestion::{AiSuggestion, CandidateScore, MealAssistantResponse, RankedSuggestion};
pub use user_preferences::UserPreferenceSet;

// ============================================================================
// Season Types
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    Northern,
    Southern,
    Unknown,
}

impl Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

impl Display for Hemisphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Hemisphere::Northern => "Northern",
            Hemisphere::Southern => "Southern",
            Hemisphere::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

/// Seasonal context derived once per request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonContext {
    pub season: Season,
    pub hemisphere: Hemisphere,
    pub month: String,
    pub has_location: bool,
}

// ============================================================================
// AI Settings
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AiProvider {
    #[serde(rename = "OpenAI")]
    OpenAi,
    Anthropic,
}

impl Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiProvider::OpenAi => write!(f, "OpenAI"),
            AiProvider::Anthropic => write!(f, "Anthropic"),
        }
    }
}

/// Household AI configuration, passed explicitly with every request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    #[serde(default)]
    pub provider: Option<AiProvider>,
    #[serde(default)]
    pub model: Option<String>,
    /// Encrypted API credential, opaque to the engine
    #[serde(default)]
    pub encrypted_api_key: Option<String>,
}

/// AI settings with every required field present
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredAi<'a> {
    pub provider: AiProvider,
    pub model: &'a str,
    pub encrypted_api_key: &'a str,
}

impl AiSettings {
    /// Returns the settings only when provider, model and credential are all set
    pub fn configured(&self) -> Option<ConfiguredAi<'_>> {
        let provider = self.provider?;
        let model = self.model.as_deref().filter(|m| !m.trim().is_empty())?;
        let encrypted_api_key = self
            .encrypted_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())?;

        Some(ConfiguredAi {
            provider,
            model,
            encrypted_api_key,
        })
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Request for the "recommended for you" feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    pub household_id: Uuid,
    pub user_id: Uuid,
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub preferences: UserPreferenceSet,
    #[serde(default)]
    pub cook_stats: HashMap<Uuid, CookStat>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

/// Request for prompt-guided suggestions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealAssistantRequest {
    pub household_id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub prompt: String,
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub preferences: UserPreferenceSet,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub ai_settings: AiSettings,
}

fn default_max_results() -> usize {
    3
}
