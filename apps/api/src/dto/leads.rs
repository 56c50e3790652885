use pagecraft_application::LeadListQuery;
use pagecraft_core::{AppError, LandingPageId};
use pagecraft_domain::{FieldValueMap, Lead, LeadStatus, TrackingParams};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Public form submission.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/submit-lead-request.ts"
)]
pub struct SubmitLeadRequest {
    #[ts(type = "Record<string, unknown>")]
    pub form_data: FieldValueMap,
    #[serde(default)]
    #[ts(type = "Record<string, string> | null")]
    pub tracking: Option<TrackingParams>,
}

/// Pipeline move for one lead.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-lead-status-request.ts"
)]
pub struct UpdateLeadStatusRequest {
    pub status: String,
    pub notes: Option<String>,
}

/// Query string of the lead listing.
#[derive(Debug, Default, Deserialize)]
pub struct LeadListQueryRequest {
    pub landing_page_id: Option<String>,
    pub status: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl LeadListQueryRequest {
    pub fn into_query(self) -> Result<LeadListQuery, AppError> {
        let defaults = LeadListQuery::default();
        Ok(LeadListQuery {
            landing_page_id: self
                .landing_page_id
                .as_deref()
                .map(LandingPageId::parse)
                .transpose()?,
            status: self
                .status
                .as_deref()
                .map(str::parse::<LeadStatus>)
                .transpose()?,
            limit: self.limit.unwrap_or(defaults.limit).clamp(1, 500),
            offset: self.offset.unwrap_or(defaults.offset),
        })
    }
}

/// API representation of a lead.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/lead-response.ts"
)]
pub struct LeadResponse {
    pub id: String,
    pub landing_page_id: String,
    pub page_type: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[ts(type = "Record<string, unknown>")]
    pub form_data: Value,
    #[ts(type = "Record<string, string>")]
    pub tracking: Value,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Lead> for LeadResponse {
    fn from(lead: Lead) -> Self {
        let contact = lead.contact().clone();
        Self {
            id: lead.id().to_string(),
            landing_page_id: lead.landing_page_id().to_string(),
            page_type: lead.page_type().as_str().to_owned(),
            email: contact.email,
            first_name: contact.first_name,
            last_name: contact.last_name,
            phone: contact.phone,
            form_data: Value::Object(lead.form_data().clone()),
            tracking: serde_json::to_value(lead.tracking()).unwrap_or(Value::Null),
            status: lead.status().as_str().to_owned(),
            notes: lead.notes().map(str::to_owned),
            created_at: lead.created_at().to_rfc3339(),
            updated_at: lead.updated_at().to_rfc3339(),
        }
    }
}
