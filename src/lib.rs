//! Household meal recommendations with optional AI re-ranking.
//!
//! Two flows are exposed through [`MealAssistant`]: a cached "recommended
//! for you" feed and prompt-guided suggestions that an AI provider may
//! re-rank. Both always return at most three recipes and never include a
//! recipe containing one of the user's allergens.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use services::recommendations::MealAssistant;
