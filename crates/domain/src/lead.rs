use std::str::FromStr;

use chrono::{DateTime, Utc};
use pagecraft_core::{AppError, AppResult, LandingPageId, LeadId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{FieldValueMap, PageType};

const TRACKING_VALUE_MAX_LENGTH: usize = 128;
const REFERRER_MAX_LENGTH: usize = 512;

/// Sales pipeline state of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    /// Just captured.
    #[default]
    New,
    /// Agent reached out.
    Contacted,
    /// Confirmed as a real opportunity.
    Qualified,
    /// Became a client.
    Converted,
    /// Dropped.
    Lost,
}

impl LeadStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Converted => "converted",
            Self::Lost => "lost",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "qualified" => Ok(Self::Qualified),
            "converted" => Ok(Self::Converted),
            "lost" => Ok(Self::Lost),
            _ => Err(AppError::Validation(format!("unknown lead status '{value}'"))),
        }
    }
}

/// Campaign attribution captured with a submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingParams {
    /// `utm_source`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    /// `utm_medium`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    /// `utm_campaign`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    /// `utm_term`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
    /// `utm_content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
    /// Referring page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

impl TrackingParams {
    /// Trims values, drops blanks, and truncates to storage limits.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            utm_source: clean(self.utm_source, TRACKING_VALUE_MAX_LENGTH),
            utm_medium: clean(self.utm_medium, TRACKING_VALUE_MAX_LENGTH),
            utm_campaign: clean(self.utm_campaign, TRACKING_VALUE_MAX_LENGTH),
            utm_term: clean(self.utm_term, TRACKING_VALUE_MAX_LENGTH),
            utm_content: clean(self.utm_content, TRACKING_VALUE_MAX_LENGTH),
            referrer: clean(self.referrer, REFERRER_MAX_LENGTH),
        }
    }
}

fn clean(value: Option<String>, max_length: usize) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.chars().take(max_length).collect())
    })
}

/// Contact fields lifted out of the submitted values for querying.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeadContact {
    /// Email address.
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
}

impl LeadContact {
    /// Extracts the well-known contact field names from submitted values.
    #[must_use]
    pub fn from_form_data(form_data: &FieldValueMap) -> Self {
        let text = |key: &str| {
            form_data
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned)
        };

        Self {
            email: text("email").map(|email| email.to_lowercase()),
            first_name: text("firstName"),
            last_name: text("lastName"),
            phone: text("phone"),
        }
    }

    /// Returns `first last` when any name part is present.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

/// A captured form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    id: LeadId,
    landing_page_id: LandingPageId,
    page_type: PageType,
    contact: LeadContact,
    form_data: FieldValueMap,
    tracking: TrackingParams,
    status: LeadStatus,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Lead {
    /// Creates a new lead from validated submitted values.
    #[must_use]
    pub fn capture(
        landing_page_id: LandingPageId,
        page_type: PageType,
        form_data: FieldValueMap,
        tracking: TrackingParams,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: LeadId::new(),
            landing_page_id,
            page_type,
            contact: LeadContact::from_form_data(&form_data),
            form_data,
            tracking: tracking.normalized(),
            status: LeadStatus::New,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Restores a lead from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: LeadId,
        landing_page_id: LandingPageId,
        page_type: PageType,
        form_data: FieldValueMap,
        tracking: TrackingParams,
        status: LeadStatus,
        notes: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            landing_page_id,
            page_type,
            contact: LeadContact::from_form_data(&form_data),
            form_data,
            tracking,
            status,
            notes,
            created_at,
            updated_at,
        }
    }

    /// Returns lead id.
    #[must_use]
    pub fn id(&self) -> LeadId {
        self.id
    }

    /// Returns source page id.
    #[must_use]
    pub fn landing_page_id(&self) -> LandingPageId {
        self.landing_page_id
    }

    /// Returns source page type.
    #[must_use]
    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    /// Returns extracted contact fields.
    #[must_use]
    pub fn contact(&self) -> &LeadContact {
        &self.contact
    }

    /// Returns every submitted value.
    #[must_use]
    pub fn form_data(&self) -> &FieldValueMap {
        &self.form_data
    }

    /// Returns campaign attribution.
    #[must_use]
    pub fn tracking(&self) -> &TrackingParams {
        &self.tracking
    }

    /// Returns pipeline state.
    #[must_use]
    pub fn status(&self) -> LeadStatus {
        self.status
    }

    /// Returns agent notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns capture timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the lead through the pipeline, optionally replacing notes.
    pub fn update_status(&mut self, status: LeadStatus, notes: Option<String>) -> AppResult<()> {
        if self.status == LeadStatus::Converted && status == LeadStatus::New {
            return Err(AppError::Conflict(format!(
                "converted lead '{}' cannot return to new",
                self.id
            )));
        }

        self.status = status;
        if let Some(notes) = notes {
            let trimmed = notes.trim();
            self.notes = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pagecraft_core::LandingPageId;
    use serde_json::json;

    use super::{Lead, LeadContact, LeadStatus, TrackingParams};
    use crate::{FieldValueMap, PageType};

    fn form_data() -> FieldValueMap {
        let mut values = FieldValueMap::new();
        values.insert("email".to_owned(), json!(" Jane@Example.COM "));
        values.insert("firstName".to_owned(), json!("Jane"));
        values.insert("lastName".to_owned(), json!(""));
        values.insert("consent".to_owned(), json!(true));
        values
    }

    #[test]
    fn contact_extraction_normalizes_email_and_drops_blanks() {
        let contact = LeadContact::from_form_data(&form_data());

        assert_eq!(contact.email.as_deref(), Some("jane@example.com"));
        assert_eq!(contact.first_name.as_deref(), Some("Jane"));
        assert!(contact.last_name.is_none());
        assert_eq!(contact.display_name().as_deref(), Some("Jane"));
    }

    #[test]
    fn tracking_params_are_trimmed_and_truncated() {
        let tracking = TrackingParams {
            utm_source: Some("  google ".to_owned()),
            utm_medium: Some("   ".to_owned()),
            utm_campaign: Some("c".repeat(300)),
            ..TrackingParams::default()
        }
        .normalized();

        assert_eq!(tracking.utm_source.as_deref(), Some("google"));
        assert!(tracking.utm_medium.is_none());
        assert_eq!(tracking.utm_campaign.map(|value| value.len()), Some(128));
    }

    #[test]
    fn converted_lead_cannot_return_to_new() {
        let mut lead = Lead::capture(
            LandingPageId::new(),
            PageType::Appraisal,
            form_data(),
            TrackingParams::default(),
        );

        assert!(
            lead.update_status(LeadStatus::Converted, Some("signed".to_owned()))
                .is_ok()
        );
        assert_eq!(lead.notes(), Some("signed"));
        assert!(lead.update_status(LeadStatus::New, None).is_err());
        assert!(lead.update_status(LeadStatus::Lost, None).is_ok());
    }
}
