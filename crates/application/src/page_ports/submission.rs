use async_trait::async_trait;
use pagecraft_core::{AppResult, LandingPageId};
use pagecraft_domain::{FieldValueMap, TrackingParams};
use serde::{Deserialize, Serialize};

/// Metadata sent alongside submitted field values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionContext {
    /// Page the form was filled on.
    pub source_page_id: Option<LandingPageId>,
    /// Campaign attribution.
    #[serde(default)]
    pub tracking: TrackingParams,
}

/// Accepted submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Identifier assigned by the receiver, when it returns one.
    pub id: Option<String>,
}

/// Port delivering a completed form to whatever stores it.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Submits the full field-value map.
    async fn submit(
        &self,
        payload: FieldValueMap,
        context: &SubmissionContext,
    ) -> AppResult<SubmissionReceipt>;
}
