use std::sync::Arc;

use pagecraft_application::{
    AnalyticsService, BlockTemplateService, LandingPageService, LeadService, SuburbService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub landing_page_service: LandingPageService,
    pub lead_service: LeadService,
    pub analytics_service: AnalyticsService,
    pub block_template_service: BlockTemplateService,
    pub suburb_service: SuburbService,
    pub admin_token: Arc<str>,
}
