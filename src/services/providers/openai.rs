//! OpenAI chat completions adapter
//!
//! Requests JSON mode (`response_format: json_object`) so the model is
//! constrained to emit a single object.
use serde::Serialize;

use crate::{
    error::AppResult,
    models::AiProvider,
    services::{providers::AiProviderAdapter, transport::ProviderRequest},
};

use super::SYSTEM_PROMPT;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    api_url: String,
}

impl OpenAiAdapter {
    pub fn new(api_url: String) -> Self {
        Self { api_url }
    }
}

impl AiProviderAdapter for OpenAiAdapter {
    fn build_request(
        &self,
        model: &str,
        api_key: &str,
        instructions: &str,
    ) -> AppResult<ProviderRequest> {
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: instructions,
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        Ok(ProviderRequest {
            url: self.api_url.clone(),
            headers: vec![("authorization".to_string(), format!("Bearer {}", api_key))],
            body: serde_json::to_string(&request)?,
        })
    }

    fn provider(&self) -> AiProvider {
        AiProvider::OpenAi
    }
}
