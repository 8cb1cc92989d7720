use serde::Serialize;

use crate::{models::AiProvider, services::redaction::redact_payload};

/// Operation name attached to every meal ranking call
pub const MEAL_ASSISTANT_OPERATION: &str = "MealAssistant";

/// One AI provider call attempt, successful or not
///
/// Payloads are raw; redaction is the audit log's job.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiCallRecord {
    pub provider: String,
    pub model: String,
    pub operation: String,
    pub request_payload: String,
    pub response_payload: Option<String>,
    pub status_code: Option<u16>,
    pub success: bool,
    pub error: Option<String>,
}

impl AiCallRecord {
    /// Starts a record for a request about to be sent
    pub fn new(provider: AiProvider, model: &str, request_payload: String) -> Self {
        Self {
            provider: provider.to_string(),
            model: model.to_string(),
            operation: MEAL_ASSISTANT_OPERATION.to_string(),
            request_payload,
            response_payload: None,
            status_code: None,
            success: false,
            error: None,
        }
    }

    pub fn succeeded(mut self, status_code: u16, response_payload: String) -> Self {
        self.status_code = Some(status_code);
        self.response_payload = Some(response_payload);
        self.success = true;
        self
    }

    pub fn failed(
        mut self,
        status_code: Option<u16>,
        response_payload: Option<String>,
        error: String,
    ) -> Self {
        self.status_code = status_code;
        self.response_payload = response_payload;
        self.success = false;
        self.error = Some(error);
        self
    }
}

/// Sink for AI call audit records
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AiAuditLog: Send + Sync {
    async fn record(&self, record: AiCallRecord);
}

/// Audit log that emits redacted records as structured tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLog;

#[async_trait::async_trait]
impl AiAuditLog for TracingAuditLog {
    async fn record(&self, record: AiCallRecord) {
        let request_payload = redact_payload(&record.request_payload);
        let response_payload = record.response_payload.as_deref().map(redact_payload);

        if record.success {
            tracing::info!(
                provider = %record.provider,
                model = %record.model,
                operation = %record.operation,
                status_code = ?record.status_code,
                "AI call succeeded"
            );
        } else {
            tracing::warn!(
                provider = %record.provider,
                model = %record.model,
                operation = %record.operation,
                status_code = ?record.status_code,
                error = ?record.error,
                "AI call failed"
            );
        }

        tracing::debug!(
            request = %request_payload,
            response = ?response_payload,
            "AI call payloads"
        );
    }
}
