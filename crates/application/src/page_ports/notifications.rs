use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagecraft_core::{AppResult, LandingPageId, LeadId};
use pagecraft_domain::{FieldValueMap, Lead, LeadContact, TrackingParams};
use serde::Serialize;

/// Port for sending transactional email.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Sends a plain-text email with an optional html alternative.
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()>;
}

/// Body posted to a page's lead webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadWebhookEvent {
    /// Event name, always `lead.created`.
    pub event: &'static str,
    /// Captured lead id.
    pub lead_id: LeadId,
    /// Source page id.
    pub landing_page_id: LandingPageId,
    /// Source page slug.
    pub page_slug: String,
    /// Extracted contact fields.
    pub contact: LeadContact,
    /// Every submitted value.
    pub form_data: FieldValueMap,
    /// Campaign attribution.
    pub tracking: TrackingParams,
    /// Capture time.
    pub created_at: DateTime<Utc>,
}

impl LeadWebhookEvent {
    /// Builds the event for a freshly captured lead.
    #[must_use]
    pub fn lead_created(lead: &Lead, page_slug: &str) -> Self {
        Self {
            event: "lead.created",
            lead_id: lead.id(),
            landing_page_id: lead.landing_page_id(),
            page_slug: page_slug.to_owned(),
            contact: lead.contact().clone(),
            form_data: lead.form_data().clone(),
            tracking: lead.tracking().clone(),
            created_at: lead.created_at(),
        }
    }
}

/// Port for delivering lead webhooks.
#[async_trait]
pub trait LeadWebhookDispatcher: Send + Sync {
    /// Posts one event to the endpoint.
    async fn dispatch_lead(&self, endpoint: &str, event: &LeadWebhookEvent) -> AppResult<()>;
}
