use serde::{Deserialize, Serialize};

/// Dietary preferences of the requesting user
///
/// Every list is matched case-insensitively as a substring of ingredient
/// names (allergens, dislikes) or tags (cuisines).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferenceSet {
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub disliked_ingredients: Vec<String>,
    #[serde(default)]
    pub favorite_cuisines: Vec<String>,
}

/// Lower-cases terms and drops blank ones
fn normalize_terms(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

impl UserPreferenceSet {
    /// Creates empty preferences
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalized_allergens(&self) -> Vec<String> {
        normalize_terms(&self.allergens)
    }

    pub fn normalized_dislikes(&self) -> Vec<String> {
        normalize_terms(&self.disliked_ingredients)
    }

    pub fn normalized_cuisines(&self) -> Vec<String> {
        normalize_terms(&self.favorite_cuisines)
    }
}
