use async_trait::async_trait;
use pagecraft_core::{AppResult, BlockTemplateId, LandingPageId, LeadId, SuburbId};
use pagecraft_domain::{
    AnalyticsEvent, AnalyticsEventType, BlockTemplate, LandingPage, Lead, LeadStatus, PageStatus,
    Suburb,
};

/// Filter for page listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageListQuery {
    /// Restricts to one lifecycle status.
    pub status: Option<PageStatus>,
}

/// Filter and window for lead listings, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadListQuery {
    /// Restricts to leads of one page.
    pub landing_page_id: Option<LandingPageId>,
    /// Restricts to one pipeline status.
    pub status: Option<LeadStatus>,
    /// Page size.
    pub limit: usize,
    /// Rows to skip.
    pub offset: usize,
}

impl Default for LeadListQuery {
    fn default() -> Self {
        Self {
            landing_page_id: None,
            status: None,
            limit: 50,
            offset: 0,
        }
    }
}

/// Repository port for landing pages.
#[async_trait]
pub trait LandingPageRepository: Send + Sync {
    /// Inserts or replaces one page. Slugs are unique across pages.
    async fn save_page(&self, page: LandingPage) -> AppResult<()>;

    /// Returns one page by id.
    async fn find_page(&self, page_id: LandingPageId) -> AppResult<Option<LandingPage>>;

    /// Returns one page by slug.
    async fn find_page_by_slug(&self, slug: &str) -> AppResult<Option<LandingPage>>;

    /// Lists pages, most recently updated first.
    async fn list_pages(&self, query: PageListQuery) -> AppResult<Vec<LandingPage>>;

    /// Deletes one page. Returns whether it existed.
    async fn delete_page(&self, page_id: LandingPageId) -> AppResult<bool>;

    /// Increments the view counter.
    async fn increment_views(&self, page_id: LandingPageId) -> AppResult<()>;

    /// Increments the submission counter.
    async fn increment_submissions(&self, page_id: LandingPageId) -> AppResult<()>;
}

/// Repository port for captured leads.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Inserts or replaces one lead.
    async fn save_lead(&self, lead: Lead) -> AppResult<()>;

    /// Returns one lead by id.
    async fn find_lead(&self, lead_id: LeadId) -> AppResult<Option<Lead>>;

    /// Lists leads matching a query.
    async fn list_leads(&self, query: LeadListQuery) -> AppResult<Vec<Lead>>;
}

/// Repository port for funnel events.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Appends one event.
    async fn append_event(&self, event: AnalyticsEvent) -> AppResult<()>;

    /// Lists the events of one page, newest first.
    async fn list_events(
        &self,
        page_id: LandingPageId,
        event_type: Option<AnalyticsEventType>,
    ) -> AppResult<Vec<AnalyticsEvent>>;
}

/// Repository port for the editor's block library.
#[async_trait]
pub trait BlockTemplateRepository: Send + Sync {
    /// Inserts or replaces one template.
    async fn save_block_template(&self, template: BlockTemplate) -> AppResult<()>;

    /// Returns one template by id.
    async fn find_block_template(
        &self,
        template_id: BlockTemplateId,
    ) -> AppResult<Option<BlockTemplate>>;

    /// Lists templates, system templates first and then by name.
    async fn list_block_templates(&self, category: Option<&str>) -> AppResult<Vec<BlockTemplate>>;
}

/// Repository port for suburb statistics.
#[async_trait]
pub trait SuburbRepository: Send + Sync {
    /// Inserts or replaces one suburb. Names are unique ignoring case.
    async fn save_suburb(&self, suburb: Suburb) -> AppResult<()>;

    /// Returns one suburb by id.
    async fn find_suburb(&self, suburb_id: SuburbId) -> AppResult<Option<Suburb>>;

    /// Returns one suburb by name, ignoring case.
    async fn find_suburb_by_name(&self, name: &str) -> AppResult<Option<Suburb>>;

    /// Lists suburbs by name, optionally only active ones.
    async fn list_suburbs(&self, active_only: bool) -> AppResult<Vec<Suburb>>;
}
