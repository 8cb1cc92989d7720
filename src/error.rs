/// Application-level errors
///
/// None of these reach the caller of the prompt-guided flow; the orchestrator
/// turns them into degraded output plus a warning.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            AppError::Timeout(20).to_string(),
            "Request timed out after 20 seconds"
        );
        assert_eq!(
            AppError::Credential("bad key".to_string()).to_string(),
            "Credential error: bad key"
        );
        assert_eq!(
            AppError::ExternalApi("status 500".to_string()).to_string(),
            "External API error: status 500"
        );

        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: AppError = parse_error.into();
        assert!(matches!(error, AppError::Serialization(_)));
    }
}
