use async_trait::async_trait;
use pagecraft_application::{SubmissionContext, SubmissionReceipt, SubmissionSink};
use pagecraft_core::{AppError, AppResult};
use pagecraft_domain::{FieldValueMap, TrackingParams};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    landing_page_id: Option<String>,
    form_data: &'a FieldValueMap,
    tracking: &'a TrackingParams,
}

/// `{success, data?, error?, message?}` reply of a submission endpoint.
#[derive(Debug, Default, Deserialize)]
struct SubmissionEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl SubmissionEnvelope {
    fn receipt_id(&self) -> Option<String> {
        self.data
            .as_ref()
            .and_then(|data| data.get("id"))
            .and_then(|id| match id {
                Value::String(text) => Some(text.clone()),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            })
    }

    fn failure_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .filter(|message| !message.trim().is_empty())
    }
}

/// Submission sink posting completed forms to a remote JSON endpoint.
#[derive(Clone)]
pub struct HttpSubmissionSink {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmissionSink {
    /// Creates a sink posting to `endpoint`.
    pub fn new(http_client: reqwest::Client, endpoint: impl Into<String>) -> AppResult<Self> {
        let endpoint = endpoint.into();
        let parsed = url::Url::parse(&endpoint).map_err(|error| {
            AppError::Configuration(format!("invalid submission endpoint '{endpoint}': {error}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Configuration(format!(
                "submission endpoint '{endpoint}' must use http or https"
            )));
        }

        Ok(Self {
            http_client,
            endpoint,
        })
    }
}

fn interpret_reply(status: reqwest::StatusCode, body: &str) -> AppResult<SubmissionReceipt> {
    let envelope = serde_json::from_str::<SubmissionEnvelope>(body).unwrap_or_default();

    if status.is_success() && envelope.success {
        return Ok(SubmissionReceipt {
            id: envelope.receipt_id(),
        });
    }

    let message = envelope.failure_message();
    if status.is_client_error() || status.is_success() {
        return Err(AppError::Validation(message.unwrap_or_else(|| {
            format!("submission rejected with status {status}")
        })));
    }

    Err(AppError::Internal(message.unwrap_or_else(|| {
        format!("submission endpoint failed with status {status}")
    })))
}

#[async_trait]
impl SubmissionSink for HttpSubmissionSink {
    async fn submit(
        &self,
        payload: FieldValueMap,
        context: &SubmissionContext,
    ) -> AppResult<SubmissionReceipt> {
        let body = SubmissionBody {
            landing_page_id: context.source_page_id.map(|page_id| page_id.to_string()),
            form_data: &payload,
            tracking: &context.tracking,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|error| {
                warn!(endpoint = %self.endpoint, %error, "submission transport error");
                AppError::Internal(format!("submission transport error: {error}"))
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| AppError::Internal(format!("failed to read reply: {error}")))?;

        interpret_reply(status, &text)
    }
}

#[cfg(test)]
mod tests {
    use pagecraft_core::AppError;
    use reqwest::StatusCode;

    use super::{HttpSubmissionSink, interpret_reply};

    #[test]
    fn accepted_replies_carry_the_receipt_id() {
        let receipt = interpret_reply(
            StatusCode::CREATED,
            r#"{"success":true,"data":{"id":"lead-42"},"message":"ok"}"#,
        );
        assert_eq!(receipt.ok().and_then(|receipt| receipt.id).as_deref(), Some("lead-42"));

        let without_id = interpret_reply(StatusCode::OK, r#"{"success":true}"#);
        assert!(without_id.is_ok_and(|receipt| receipt.id.is_none()));
    }

    #[test]
    fn rejected_replies_surface_the_server_message() {
        let rejected = interpret_reply(
            StatusCode::BAD_REQUEST,
            r#"{"success":false,"error":"email: Please enter a valid email address"}"#,
        );
        assert!(matches!(rejected, Err(AppError::Validation(message)) if message.starts_with("email")));

        let refused = interpret_reply(StatusCode::OK, r#"{"success":false}"#);
        assert!(matches!(refused, Err(AppError::Validation(_))));

        let crashed = interpret_reply(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(matches!(crashed, Err(AppError::Internal(message)) if message.contains("502")));
    }

    #[test]
    fn endpoints_must_be_http_urls() {
        assert!(HttpSubmissionSink::new(reqwest::Client::new(), "https://example.com/api").is_ok());
        assert!(matches!(
            HttpSubmissionSink::new(reqwest::Client::new(), "ftp://example.com"),
            Err(AppError::Configuration(_))
        ));
        assert!(HttpSubmissionSink::new(reqwest::Client::new(), "not a url").is_err());
    }
}
