use std::str::FromStr;

use chrono::{DateTime, Utc};
use pagecraft_core::{AppError, AppResult, LandingPageId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maximum session id length.
pub const SESSION_ID_MAX_LENGTH: usize = 64;
/// Highest step number accepted on funnel events.
pub const MAX_TRACKED_STEP: u8 = 10;

/// Funnel event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsEventType {
    /// Page rendered for a visitor.
    PageView,
    /// Visitor interacted with the first field.
    FormStart,
    /// Visitor advanced past a step.
    StepComplete,
    /// Submission accepted.
    FormSubmit,
    /// Call-to-action pressed.
    CtaClick,
}

impl AnalyticsEventType {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageView => "page_view",
            Self::FormStart => "form_start",
            Self::StepComplete => "step_complete",
            Self::FormSubmit => "form_submit",
            Self::CtaClick => "cta_click",
        }
    }
}

impl FromStr for AnalyticsEventType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "page_view" => Ok(Self::PageView),
            "form_start" => Ok(Self::FormStart),
            "step_complete" => Ok(Self::StepComplete),
            "form_submit" => Ok(Self::FormSubmit),
            "cta_click" => Ok(Self::CtaClick),
            _ => Err(AppError::Validation(format!(
                "unknown analytics event type '{value}'"
            ))),
        }
    }
}

/// One recorded funnel event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    landing_page_id: Option<LandingPageId>,
    session_id: Option<String>,
    event_type: AnalyticsEventType,
    event_data: Map<String, Value>,
    step_number: Option<u8>,
    created_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    /// Creates a validated event.
    pub fn new(
        landing_page_id: Option<LandingPageId>,
        session_id: Option<String>,
        event_type: AnalyticsEventType,
        event_data: Map<String, Value>,
        step_number: Option<u8>,
    ) -> AppResult<Self> {
        let session_id = session_id.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });
        if session_id
            .as_deref()
            .is_some_and(|value| value.len() > SESSION_ID_MAX_LENGTH)
        {
            return Err(AppError::Validation(format!(
                "session id must be at most {SESSION_ID_MAX_LENGTH} characters"
            )));
        }

        if let Some(step_number) = step_number
            && !(1..=MAX_TRACKED_STEP).contains(&step_number)
        {
            return Err(AppError::Validation(format!(
                "step number must be between 1 and {MAX_TRACKED_STEP}"
            )));
        }

        Ok(Self {
            landing_page_id,
            session_id,
            event_type,
            event_data,
            step_number,
            created_at: Utc::now(),
        })
    }

    /// Restores an event from storage.
    #[must_use]
    pub fn restore(
        landing_page_id: Option<LandingPageId>,
        session_id: Option<String>,
        event_type: AnalyticsEventType,
        event_data: Map<String, Value>,
        step_number: Option<u8>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            landing_page_id,
            session_id,
            event_type,
            event_data,
            step_number,
            created_at,
        }
    }

    /// Returns source page id.
    #[must_use]
    pub fn landing_page_id(&self) -> Option<LandingPageId> {
        self.landing_page_id
    }

    /// Returns visitor session id.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Returns event kind.
    #[must_use]
    pub fn event_type(&self) -> AnalyticsEventType {
        self.event_type
    }

    /// Returns free-form payload.
    #[must_use]
    pub fn event_data(&self) -> &Map<String, Value> {
        &self.event_data
    }

    /// Returns step number for step events.
    #[must_use]
    pub fn step_number(&self) -> Option<u8> {
        self.step_number
    }

    /// Returns record timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
