use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A household recipe as handed to the engine by the recipe store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<RecipeImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeImage {
    pub url: String,
    #[serde(default)]
    pub is_hero: bool,
    #[serde(default)]
    pub order_index: i32,
}

/// Cook history summary for one recipe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CookStat {
    pub cook_count: u32,
    #[serde(default)]
    pub last_cooked_at: Option<DateTime<Utc>>,
}

impl Ingredient {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
            notes: None,
        }
    }
}

impl Recipe {
    /// Creates a recipe with a fresh id and no images
    pub fn new(title: impl Into<String>, ingredients: &[&str], tags: &[&str]) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            ingredients: ingredients.iter().map(|name| Ingredient::named(*name)).collect(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            images: Vec::new(),
        }
    }

    /// URL of the image shown on suggestion cards
    ///
    /// The hero image with the lowest order index wins; without a hero, the
    /// first image by order index is used.
    pub fn title_image_url(&self) -> Option<String> {
        let hero = self
            .images
            .iter()
            .filter(|image| image.is_hero)
            .min_by_key(|image| image.order_index);

        hero.or_else(|| self.images.iter().min_by_key(|image| image.order_index))
            .map(|image| image.url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(url: &str, is_hero: bool, order_index: i32) -> RecipeImage {
        RecipeImage {
            url: url.to_string(),
            is_hero,
            order_index,
        }
    }

    #[test]
    fn test_title_image_prefers_hero() {
        let mut recipe = Recipe::new("Lasagna", &["pasta"], &[]);
        recipe.images = vec![
            image("https://img/1.jpg", false, 0),
            image("https://img/2.jpg", true, 3),
        ];
        assert_eq!(recipe.title_image_url().as_deref(), Some("https://img/2.jpg"));
    }

    #[test]
    fn test_title_image_falls_back_to_lowest_order() {
        let mut recipe = Recipe::new("Lasagna", &["pasta"], &[]);
        recipe.images = vec![
            image("https://img/b.jpg", false, 2),
            image("https://img/a.jpg", false, 1),
        ];
        assert_eq!(recipe.title_image_url().as_deref(), Some("https://img/a.jpg"));
    }

    #[test]
    fn test_title_image_none_without_images() {
        let recipe = Recipe::new("Toast", &["bread"], &[]);
        assert_eq!(recipe.title_image_url(), None);
    }

    #[test]
    fn test_recipe_deserializes_with_missing_collections() {
        let json = r#"{"id":"9f1c1f0e-8f43-4c55-9a3e-0c1d2b3a4f5e","title":"Plain Rice"}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.title, "Plain Rice");
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.tags.is_empty());
        assert!(recipe.images.is_empty());
    }
}
