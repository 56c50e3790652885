use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Envelope returned for an accepted lead submission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/submission-accepted-response.ts"
)]
pub struct SubmissionAcceptedResponse {
    pub success: bool,
    #[ts(type = "{ id: string }")]
    pub data: serde_json::Value,
    pub message: String,
}

impl SubmissionAcceptedResponse {
    pub fn for_lead(lead_id: String) -> Self {
        Self {
            success: true,
            data: serde_json::json!({ "id": lead_id }),
            message: "Thanks! We've received your details.".to_owned(),
        }
    }
}

/// Number of pages or library blocks created by a seed run.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/seed-templates-response.ts"
)]
pub struct SeedTemplatesResponse {
    pub created: usize,
}
