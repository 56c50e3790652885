use std::collections::HashMap;

use async_trait::async_trait;
use pagecraft_application::{
    AnalyticsRepository, BlockTemplateRepository, LandingPageRepository, LeadListQuery,
    LeadRepository, PageListQuery, SuburbRepository,
};
use pagecraft_core::{AppError, AppResult, BlockTemplateId, LandingPageId, LeadId, SuburbId};
use pagecraft_domain::{
    AnalyticsEvent, AnalyticsEventType, BlockTemplate, LandingPage, Lead, Suburb,
};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredPage {
    page: LandingPage,
    views: i64,
    submissions: i64,
}

impl StoredPage {
    fn snapshot(&self) -> AppResult<LandingPage> {
        let page = &self.page;
        LandingPage::restore(
            page.id(),
            page.slug().clone(),
            page.name(),
            page.status(),
            page.page_type(),
            page.seo().clone(),
            page.document().clone(),
            (self.views, self.submissions),
            page.created_at(),
            page.updated_at(),
            page.published_at(),
        )
    }
}

/// In-memory landing page repository. Counters live beside the page and
/// survive saves of stale copies.
#[derive(Debug, Default)]
pub struct InMemoryLandingPageRepository {
    pages: RwLock<HashMap<LandingPageId, StoredPage>>,
}

impl InMemoryLandingPageRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn bump(
        &self,
        page_id: LandingPageId,
        counter: impl FnOnce(&mut StoredPage),
    ) -> AppResult<()> {
        let mut pages = self.pages.write().await;
        let stored = pages
            .get_mut(&page_id)
            .ok_or_else(|| AppError::NotFound(format!("landing page '{page_id}'")))?;
        counter(stored);
        Ok(())
    }
}

#[async_trait]
impl LandingPageRepository for InMemoryLandingPageRepository {
    async fn save_page(&self, page: LandingPage) -> AppResult<()> {
        let mut pages = self.pages.write().await;

        if pages.values().any(|stored| {
            stored.page.slug() == page.slug() && stored.page.id() != page.id()
        }) {
            return Err(AppError::Conflict(format!(
                "slug '{}' is already in use",
                page.slug().as_str()
            )));
        }

        let (views, submissions) = pages
            .get(&page.id())
            .map_or((page.views(), page.submissions()), |stored| {
                (stored.views, stored.submissions)
            });
        pages.insert(
            page.id(),
            StoredPage {
                page,
                views,
                submissions,
            },
        );
        Ok(())
    }

    async fn find_page(&self, page_id: LandingPageId) -> AppResult<Option<LandingPage>> {
        self.pages
            .read()
            .await
            .get(&page_id)
            .map(StoredPage::snapshot)
            .transpose()
    }

    async fn find_page_by_slug(&self, slug: &str) -> AppResult<Option<LandingPage>> {
        self.pages
            .read()
            .await
            .values()
            .find(|stored| stored.page.slug().as_str() == slug)
            .map(StoredPage::snapshot)
            .transpose()
    }

    async fn list_pages(&self, query: PageListQuery) -> AppResult<Vec<LandingPage>> {
        let pages = self.pages.read().await;
        let mut values = pages
            .values()
            .filter(|stored| query.status.is_none_or(|status| stored.page.status() == status))
            .map(StoredPage::snapshot)
            .collect::<AppResult<Vec<_>>>()?;
        values.sort_by_key(|page| std::cmp::Reverse(page.updated_at()));

        Ok(values)
    }

    async fn delete_page(&self, page_id: LandingPageId) -> AppResult<bool> {
        Ok(self.pages.write().await.remove(&page_id).is_some())
    }

    async fn increment_views(&self, page_id: LandingPageId) -> AppResult<()> {
        self.bump(page_id, |stored| stored.views += 1).await
    }

    async fn increment_submissions(&self, page_id: LandingPageId) -> AppResult<()> {
        self.bump(page_id, |stored| stored.submissions += 1).await
    }
}

/// In-memory lead repository keeping insertion order.
#[derive(Debug, Default)]
pub struct InMemoryLeadRepository {
    leads: RwLock<Vec<Lead>>,
}

impl InMemoryLeadRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn save_lead(&self, lead: Lead) -> AppResult<()> {
        let mut leads = self.leads.write().await;
        match leads.iter_mut().find(|existing| existing.id() == lead.id()) {
            Some(existing) => *existing = lead,
            None => leads.push(lead),
        }
        Ok(())
    }

    async fn find_lead(&self, lead_id: LeadId) -> AppResult<Option<Lead>> {
        Ok(self
            .leads
            .read()
            .await
            .iter()
            .find(|lead| lead.id() == lead_id)
            .cloned())
    }

    async fn list_leads(&self, query: LeadListQuery) -> AppResult<Vec<Lead>> {
        Ok(self
            .leads
            .read()
            .await
            .iter()
            .rev()
            .filter(|lead| {
                query
                    .landing_page_id
                    .is_none_or(|page_id| lead.landing_page_id() == page_id)
            })
            .filter(|lead| query.status.is_none_or(|status| lead.status() == status))
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}

/// In-memory append-only event log.
#[derive(Debug, Default)]
pub struct InMemoryAnalyticsRepository {
    events: RwLock<Vec<AnalyticsEvent>>,
}

impl InMemoryAnalyticsRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalyticsRepository for InMemoryAnalyticsRepository {
    async fn append_event(&self, event: AnalyticsEvent) -> AppResult<()> {
        self.events.write().await.push(event);
        Ok(())
    }

    async fn list_events(
        &self,
        page_id: LandingPageId,
        event_type: Option<AnalyticsEventType>,
    ) -> AppResult<Vec<AnalyticsEvent>> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .rev()
            .filter(|event| event.landing_page_id() == Some(page_id))
            .filter(|event| event_type.is_none_or(|wanted| event.event_type() == wanted))
            .cloned()
            .collect())
    }
}

/// In-memory block library.
#[derive(Debug, Default)]
pub struct InMemoryBlockTemplateRepository {
    templates: RwLock<HashMap<BlockTemplateId, BlockTemplate>>,
}

impl InMemoryBlockTemplateRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlockTemplateRepository for InMemoryBlockTemplateRepository {
    async fn save_block_template(&self, template: BlockTemplate) -> AppResult<()> {
        self.templates.write().await.insert(template.id(), template);
        Ok(())
    }

    async fn find_block_template(
        &self,
        template_id: BlockTemplateId,
    ) -> AppResult<Option<BlockTemplate>> {
        Ok(self.templates.read().await.get(&template_id).cloned())
    }

    async fn list_block_templates(&self, category: Option<&str>) -> AppResult<Vec<BlockTemplate>> {
        let mut values: Vec<BlockTemplate> = self
            .templates
            .read()
            .await
            .values()
            .filter(|template| category.is_none_or(|category| template.category() == category))
            .cloned()
            .collect();
        values.sort_by(|left, right| {
            right
                .is_system()
                .cmp(&left.is_system())
                .then_with(|| left.name().cmp(right.name()))
        });

        Ok(values)
    }
}

/// In-memory suburb statistics.
#[derive(Debug, Default)]
pub struct InMemorySuburbRepository {
    suburbs: RwLock<HashMap<SuburbId, Suburb>>,
}

impl InMemorySuburbRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SuburbRepository for InMemorySuburbRepository {
    async fn save_suburb(&self, suburb: Suburb) -> AppResult<()> {
        let mut suburbs = self.suburbs.write().await;
        if suburbs
            .values()
            .any(|stored| stored.matches_name(suburb.name()) && stored.id() != suburb.id())
        {
            return Err(AppError::Conflict(format!(
                "suburb '{}' already exists",
                suburb.name()
            )));
        }

        suburbs.insert(suburb.id(), suburb);
        Ok(())
    }

    async fn find_suburb(&self, suburb_id: SuburbId) -> AppResult<Option<Suburb>> {
        Ok(self.suburbs.read().await.get(&suburb_id).cloned())
    }

    async fn find_suburb_by_name(&self, name: &str) -> AppResult<Option<Suburb>> {
        Ok(self
            .suburbs
            .read()
            .await
            .values()
            .find(|suburb| suburb.matches_name(name))
            .cloned())
    }

    async fn list_suburbs(&self, active_only: bool) -> AppResult<Vec<Suburb>> {
        let mut values: Vec<Suburb> = self
            .suburbs
            .read()
            .await
            .values()
            .filter(|suburb| !active_only || suburb.is_active())
            .cloned()
            .collect();
        values.sort_by(|left, right| left.name().cmp(right.name()));

        Ok(values)
    }
}
