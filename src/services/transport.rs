use reqwest::Client as HttpClient;

use crate::error::AppResult;

/// An outbound JSON POST, fully prepared by a provider adapter
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub url: String,
    /// Header pairs, credentials included; never logged
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body
    pub body: String,
}

/// Raw status and body of a provider response
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// "Send request, get status and body" client used for AI provider calls
///
/// Implementations must be cancellation safe: dropping the returned future
/// aborts the request.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(&self, request: &ProviderRequest) -> AppResult<TransportResponse>;
}

/// reqwest-backed transport
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    http_client: HttpClient,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            http_client: HttpClient::new(),
        }
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, request: &ProviderRequest) -> AppResult<TransportResponse> {
        let mut builder = self
            .http_client
            .post(&request.url)
            .header("content-type", "application/json");

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(
            url = %request.url,
            status,
            bytes = body.len(),
            "Provider response received"
        );

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let response = |status| TransportResponse {
            status,
            body: String::new(),
        };
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(199).is_success());
        assert!(!response(429).is_success());
        assert!(!response(500).is_success());
    }
}
