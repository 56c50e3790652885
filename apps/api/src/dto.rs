mod analytics;
mod block_templates;
mod common;
mod leads;
mod pages;
mod suburbs;

pub use analytics::{AnalyticsEventResponse, AnalyticsEventsQuery, TrackEventRequest};
pub use block_templates::{
    BlockTemplateListQuery, BlockTemplateResponse, CreateBlockTemplateRequest,
};
pub use common::{HealthResponse, SeedTemplatesResponse, SubmissionAcceptedResponse};
pub use leads::{LeadListQueryRequest, LeadResponse, SubmitLeadRequest, UpdateLeadStatusRequest};
pub use pages::{
    CreatePageRequest, DocumentEditResponse, EditDocumentRequest, PageListQueryRequest,
    PageResponse, PageSeoRequest, UpdatePageRequest,
};
pub use suburbs::{CreateSuburbRequest, SuburbResponse, UpdateSuburbRequest};

#[cfg(test)]
mod tests {
    use super::{
        AnalyticsEventResponse, BlockTemplateResponse, CreateBlockTemplateRequest,
        CreatePageRequest, CreateSuburbRequest, DocumentEditResponse, EditDocumentRequest,
        HealthResponse, LeadResponse, PageResponse, PageSeoRequest, SeedTemplatesResponse,
        SubmissionAcceptedResponse, SubmitLeadRequest, SuburbResponse, TrackEventRequest,
        UpdateLeadStatusRequest, UpdatePageRequest, UpdateSuburbRequest,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        CreatePageRequest::export(&config)?;
        UpdatePageRequest::export(&config)?;
        PageSeoRequest::export(&config)?;
        EditDocumentRequest::export(&config)?;
        PageResponse::export(&config)?;
        DocumentEditResponse::export(&config)?;
        SubmitLeadRequest::export(&config)?;
        UpdateLeadStatusRequest::export(&config)?;
        LeadResponse::export(&config)?;
        TrackEventRequest::export(&config)?;
        AnalyticsEventResponse::export(&config)?;
        SubmissionAcceptedResponse::export(&config)?;
        SeedTemplatesResponse::export(&config)?;
        CreateBlockTemplateRequest::export(&config)?;
        BlockTemplateResponse::export(&config)?;
        CreateSuburbRequest::export(&config)?;
        UpdateSuburbRequest::export(&config)?;
        SuburbResponse::export(&config)?;
        HealthResponse::export(&config)?;
        ErrorResponse::export(&config)?;

        Ok(())
    }
}
