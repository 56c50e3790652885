use std::time::Duration;

use async_trait::async_trait;
use pagecraft_application::{LeadWebhookDispatcher, LeadWebhookEvent};
use pagecraft_core::{AppError, AppResult};
use tracing::debug;

/// Posts lead events to page-configured webhooks with bounded retries.
pub struct HttpLeadWebhookDispatcher {
    http_client: reqwest::Client,
    max_attempts: u8,
    retry_backoff_ms: u64,
}

impl HttpLeadWebhookDispatcher {
    /// Creates a new lead webhook dispatcher.
    #[must_use]
    pub fn new(http_client: reqwest::Client, max_attempts: u8, retry_backoff_ms: u64) -> Self {
        Self {
            http_client,
            max_attempts: max_attempts.max(1),
            retry_backoff_ms: retry_backoff_ms.max(50),
        }
    }

    async fn dispatch_with_retry<F>(&self, idempotency_key: &str, mut build: F) -> AppResult<()>
    where
        F: FnMut(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut attempt = 0_u8;
        let mut last_error: Option<String> = None;

        while attempt < self.max_attempts {
            attempt = attempt.saturating_add(1);
            let response = build(&self.http_client).send().await;

            match response {
                Ok(response) if response.status().is_success() => {
                    debug!(idempotency_key, attempt, "lead webhook delivered");
                    return Ok(());
                }
                Ok(response)
                    if response.status().is_server_error()
                        || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS =>
                {
                    last_error = Some(format!(
                        "transient HTTP status {} for lead webhook '{idempotency_key}'",
                        response.status()
                    ));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
                    return Err(AppError::Validation(format!(
                        "lead webhook rejected with status {status}: {body}"
                    )));
                }
                Err(error) => {
                    last_error = Some(format!("lead webhook transport error: {error}"));
                }
            }

            if attempt < self.max_attempts {
                let delay = self.retry_backoff_ms.saturating_mul(u64::from(attempt));
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(AppError::Internal(last_error.unwrap_or_else(|| {
            "lead webhook exhausted retries".to_owned()
        })))
    }
}

#[async_trait]
impl LeadWebhookDispatcher for HttpLeadWebhookDispatcher {
    async fn dispatch_lead(&self, endpoint: &str, event: &LeadWebhookEvent) -> AppResult<()> {
        let idempotency_key = event.lead_id.to_string();
        self.dispatch_with_retry(&idempotency_key, |client| {
            client
                .post(endpoint)
                .header("Idempotency-Key", idempotency_key.as_str())
                .header("X-Pagecraft-Event", event.event)
                .json(event)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use pagecraft_application::{LeadWebhookDispatcher, LeadWebhookEvent};
    use pagecraft_core::{AppError, LandingPageId};
    use pagecraft_domain::{FieldValueMap, Lead, PageType, TrackingParams};

    use super::HttpLeadWebhookDispatcher;

    #[test]
    fn retry_settings_are_clamped() {
        let dispatcher = HttpLeadWebhookDispatcher::new(reqwest::Client::new(), 0, 0);
        assert_eq!(dispatcher.max_attempts, 1);
        assert_eq!(dispatcher.retry_backoff_ms, 50);
    }

    #[tokio::test]
    async fn unreachable_endpoints_fail_after_retries() {
        let dispatcher = HttpLeadWebhookDispatcher::new(reqwest::Client::new(), 2, 50);
        let lead = Lead::capture(
            LandingPageId::new(),
            PageType::Custom,
            FieldValueMap::new(),
            TrackingParams::default(),
        );
        let event = LeadWebhookEvent::lead_created(&lead, "contact-us");

        let result = dispatcher
            .dispatch_lead("http://127.0.0.1:9/leads", &event)
            .await;

        assert!(matches!(result, Err(AppError::Internal(message)) if message.contains("transport")));
    }
}
