use serde::Deserialize;

/// Application configuration loaded from environment variables
///
/// Household AI settings (provider, model, credential) are not part of this;
/// they travel with each request as [`crate::models::AiSettings`].
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL; feed results are not cached when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// How long a user's feed ranking stays cached, in seconds
    #[serde(default = "default_feed_cache_ttl_secs")]
    pub feed_cache_ttl_secs: u64,

    /// Upper bound on a single AI provider call, in seconds
    #[serde(default = "default_ai_timeout_secs")]
    pub ai_timeout_secs: u64,

    /// OpenAI chat completions endpoint
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Anthropic messages endpoint
    #[serde(default = "default_anthropic_api_url")]
    pub anthropic_api_url: String,

    /// `max_tokens` sent with Anthropic requests
    #[serde(default = "default_anthropic_max_tokens")]
    pub anthropic_max_tokens: u32,

    /// Base64-encoded 32-byte AES key used to decrypt stored API credentials
    #[serde(default)]
    pub credential_key: Option<String>,
}

fn default_feed_cache_ttl_secs() -> u64 {
    300
}

fn default_ai_timeout_secs() -> u64 {
    30
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_anthropic_api_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_anthropic_max_tokens() -> u32 {
    1024
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: None,
            feed_cache_ttl_secs: default_feed_cache_ttl_secs(),
            ai_timeout_secs: default_ai_timeout_secs(),
            openai_api_url: default_openai_api_url(),
            anthropic_api_url: default_anthropic_api_url(),
            anthropic_max_tokens: default_anthropic_max_tokens(),
            credential_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn ai_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ai_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.redis_url, None);
        assert_eq!(config.feed_cache_ttl_secs, 300);
        assert_eq!(config.ai_timeout_secs, 30);
        assert_eq!(
            config.openai_api_url,
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(config.anthropic_api_url, "https://api.anthropic.com/v1/messages");
        assert_eq!(config.anthropic_max_tokens, 1024);
        assert_eq!(config.credential_key, None);
    }

    #[test]
    fn test_overrides_from_environment() {
        let vars = vec![
            ("REDIS_URL".to_string(), "redis://cache:6379".to_string()),
            ("FEED_CACHE_TTL_SECS".to_string(), "60".to_string()),
            ("AI_TIMEOUT_SECS".to_string(), "5".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.feed_cache_ttl_secs, 60);
        assert_eq!(config.ai_timeout(), std::time::Duration::from_secs(5));
    }
}
