//! AI provider adapters
//!
//! Each supported provider gets an adapter that turns the ranking
//! instructions into a ready-to-send HTTP request. Response parsing is shared
//! (see `services::extraction`), since both providers only differ in where
//! the assistant text sits in the response body.
use crate::{
    config::Config, error::AppResult, models::AiProvider, services::transport::ProviderRequest,
};

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicAdapter;
pub use openai::OpenAiAdapter;

/// System message sent ahead of the ranking instructions
pub const SYSTEM_PROMPT: &str = "You are a meal planning assistant for a household. \
You only recommend recipes from the list you are given \
and you always answer with a single JSON object.";

/// Trait for AI provider request builders
pub trait AiProviderAdapter: Send + Sync {
    /// Builds the provider-specific request carrying `instructions` as the user message
    fn build_request(&self, model: &str, api_key: &str, instructions: &str)
        -> AppResult<ProviderRequest>;

    /// Provider served by this adapter, for logging and audit
    fn provider(&self) -> AiProvider;
}

/// Returns the adapter for a household's configured provider
pub fn adapter_for(provider: AiProvider, config: &Config) -> Box<dyn AiProviderAdapter> {
    match provider {
        AiProvider::OpenAi => Box::new(OpenAiAdapter::new(config.openai_api_url.clone())),
        AiProvider::Anthropic => Box::new(AnthropicAdapter::new(
            config.anthropic_api_url.clone(),
            config.anthropic_max_tokens,
        )),
    }
}
