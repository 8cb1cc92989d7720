//! Anthropic messages adapter
use serde::Serialize;

use crate::{
    error::AppResult,
    models::AiProvider,
    services::{providers::AiProviderAdapter, transport::ProviderRequest},
};

use super::SYSTEM_PROMPT;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    api_url: String,
    max_tokens: u32,
}

impl AnthropicAdapter {
    pub fn new(api_url: String, max_tokens: u32) -> Self {
        Self {
            api_url,
            max_tokens,
        }
    }
}

impl AiProviderAdapter for AnthropicAdapter {
    fn build_request(
        &self,
        model: &str,
        api_key: &str,
        instructions: &str,
    ) -> AppResult<ProviderRequest> {
        let request = MessagesRequest {
            model,
            max_tokens: self.max_tokens,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: instructions,
            }],
        };

        Ok(ProviderRequest {
            url: self.api_url.clone(),
            headers: vec![
                ("x-api-key".to_string(), api_key.to_string()),
                ("anthropic-version".to_string(), ANTHROPIC_VERSION.to_string()),
            ],
            body: serde_json::to_string(&request)?,
        })
    }

    fn provider(&self) -> AiProvider {
        AiProvider::Anthropic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_build_request_shape() {
        let adapter =
            AnthropicAdapter::new("https://api.anthropic.com/v1/messages".to_string(), 800);
        let request = adapter
            .build_request("claude-3-5-haiku-latest", "sk-ant-test", "Pick three dinners")
            .unwrap();

        assert_eq!(request.url, "https://api.anthropic.com/v1/messages");
        assert!(request
            .headers
            .contains(&("x-api-key".to_string(), "sk-ant-test".to_string())));
        assert!(request
            .headers
            .contains(&("anthropic-version".to_string(), "2023-06-01".to_string())));

        let body: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["model"], "claude-3-5-haiku-latest");
        assert_eq!(body["max_tokens"], 800);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Pick three dinners");
        assert!(body["system"].as_str().unwrap().contains("JSON"));
    }
}
