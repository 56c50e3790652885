use pagecraft_application::TrackEventInput;
use pagecraft_core::{AppError, LandingPageId};
use pagecraft_domain::{AnalyticsEvent, AnalyticsEventType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

/// Public funnel event.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/track-event-request.ts"
)]
pub struct TrackEventRequest {
    pub landing_page_id: Option<String>,
    pub session_id: Option<String>,
    pub event_type: String,
    #[serde(default)]
    #[ts(type = "Record<string, unknown> | null")]
    pub event_data: Option<Map<String, Value>>,
    pub step_number: Option<u8>,
}

impl TrackEventRequest {
    pub fn into_input(self) -> Result<TrackEventInput, AppError> {
        Ok(TrackEventInput {
            landing_page_id: self
                .landing_page_id
                .as_deref()
                .map(LandingPageId::parse)
                .transpose()?,
            session_id: self.session_id,
            event_type: self.event_type.parse::<AnalyticsEventType>()?,
            event_data: self.event_data.unwrap_or_default(),
            step_number: self.step_number,
        })
    }
}

/// Query string of the event listing.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsEventsQuery {
    pub event_type: Option<String>,
}

impl AnalyticsEventsQuery {
    pub fn event_type(&self) -> Result<Option<AnalyticsEventType>, AppError> {
        self.event_type
            .as_deref()
            .map(str::parse::<AnalyticsEventType>)
            .transpose()
    }
}

/// API representation of a stored event.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/analytics-event-response.ts"
)]
pub struct AnalyticsEventResponse {
    pub landing_page_id: Option<String>,
    pub session_id: Option<String>,
    pub event_type: String,
    #[ts(type = "Record<string, unknown>")]
    pub event_data: Value,
    pub step_number: Option<u8>,
    pub created_at: String,
}

impl From<AnalyticsEvent> for AnalyticsEventResponse {
    fn from(event: AnalyticsEvent) -> Self {
        Self {
            landing_page_id: event.landing_page_id().map(|page_id| page_id.to_string()),
            session_id: event.session_id().map(str::to_owned),
            event_type: event.event_type().as_str().to_owned(),
            event_data: Value::Object(event.event_data().clone()),
            step_number: event.step_number(),
            created_at: event.created_at().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pagecraft_core::AppError;
    use pagecraft_domain::AnalyticsEventType;

    use super::TrackEventRequest;

    #[test]
    fn track_requests_parse_event_types() {
        let request = serde_json::from_str::<TrackEventRequest>(
            r#"{"eventType":"step_complete","stepNumber":2,"sessionId":"abc"}"#,
        )
        .unwrap_or_else(|_| unreachable!());
        let input = request.into_input();
        assert!(input.is_ok_and(|input| input.event_type == AnalyticsEventType::StepComplete
            && input.step_number == Some(2)));

        let unknown = serde_json::from_str::<TrackEventRequest>(r#"{"eventType":"scroll"}"#)
            .unwrap_or_else(|_| unreachable!());
        assert!(matches!(unknown.into_input(), Err(AppError::Validation(_))));
    }
}
