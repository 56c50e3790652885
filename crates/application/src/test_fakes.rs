use std::collections::HashMap;

use async_trait::async_trait;
use pagecraft_core::{AppError, AppResult, BlockTemplateId, LandingPageId, LeadId, SuburbId};
use pagecraft_domain::{BlockTemplate, LandingPage, Lead, Suburb};
use tokio::sync::Mutex;

use crate::page_ports::{
    BlockTemplateRepository, LandingPageRepository, LeadListQuery, LeadRepository, PageListQuery,
    SuburbRepository,
};

#[derive(Default)]
pub(crate) struct FakeLandingPageRepository {
    pub(crate) pages: Mutex<HashMap<LandingPageId, LandingPage>>,
    pub(crate) views: Mutex<HashMap<LandingPageId, i64>>,
    pub(crate) submissions: Mutex<HashMap<LandingPageId, i64>>,
}

#[async_trait]
impl LandingPageRepository for FakeLandingPageRepository {
    async fn save_page(&self, page: LandingPage) -> AppResult<()> {
        let mut pages = self.pages.lock().await;
        if pages
            .values()
            .any(|existing| existing.slug() == page.slug() && existing.id() != page.id())
        {
            return Err(AppError::Conflict("slug taken".to_owned()));
        }
        pages.insert(page.id(), page);
        Ok(())
    }

    async fn find_page(&self, page_id: LandingPageId) -> AppResult<Option<LandingPage>> {
        Ok(self.pages.lock().await.get(&page_id).cloned())
    }

    async fn find_page_by_slug(&self, slug: &str) -> AppResult<Option<LandingPage>> {
        Ok(self
            .pages
            .lock()
            .await
            .values()
            .find(|page| page.slug().as_str() == slug)
            .cloned())
    }

    async fn list_pages(&self, query: PageListQuery) -> AppResult<Vec<LandingPage>> {
        Ok(self
            .pages
            .lock()
            .await
            .values()
            .filter(|page| query.status.is_none_or(|status| page.status() == status))
            .cloned()
            .collect())
    }

    async fn delete_page(&self, page_id: LandingPageId) -> AppResult<bool> {
        Ok(self.pages.lock().await.remove(&page_id).is_some())
    }

    async fn increment_views(&self, page_id: LandingPageId) -> AppResult<()> {
        *self.views.lock().await.entry(page_id).or_insert(0) += 1;
        Ok(())
    }

    async fn increment_submissions(&self, page_id: LandingPageId) -> AppResult<()> {
        *self.submissions.lock().await.entry(page_id).or_insert(0) += 1;
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeLeadRepository {
    pub(crate) leads: Mutex<Vec<Lead>>,
}

#[async_trait]
impl LeadRepository for FakeLeadRepository {
    async fn save_lead(&self, lead: Lead) -> AppResult<()> {
        let mut leads = self.leads.lock().await;
        leads.retain(|existing| existing.id() != lead.id());
        leads.push(lead);
        Ok(())
    }

    async fn find_lead(&self, lead_id: LeadId) -> AppResult<Option<Lead>> {
        Ok(self
            .leads
            .lock()
            .await
            .iter()
            .find(|lead| lead.id() == lead_id)
            .cloned())
    }

    async fn list_leads(&self, query: LeadListQuery) -> AppResult<Vec<Lead>> {
        Ok(self
            .leads
            .lock()
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

#[derive(Default)]
pub(crate) struct FakeBlockTemplateRepository {
    pub(crate) templates: Mutex<Vec<BlockTemplate>>,
}

#[async_trait]
impl BlockTemplateRepository for FakeBlockTemplateRepository {
    async fn save_block_template(&self, template: BlockTemplate) -> AppResult<()> {
        let mut templates = self.templates.lock().await;
        templates.retain(|existing| existing.id() != template.id());
        templates.push(template);
        Ok(())
    }

    async fn find_block_template(
        &self,
        template_id: BlockTemplateId,
    ) -> AppResult<Option<BlockTemplate>> {
        Ok(self
            .templates
            .lock()
            .await
            .iter()
            .find(|template| template.id() == template_id)
            .cloned())
    }

    async fn list_block_templates(&self, category: Option<&str>) -> AppResult<Vec<BlockTemplate>> {
        Ok(self
            .templates
            .lock()
            .await
            .iter()
            .filter(|template| category.is_none_or(|category| template.category() == category))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeSuburbRepository {
    pub(crate) suburbs: Mutex<Vec<Suburb>>,
}

#[async_trait]
impl SuburbRepository for FakeSuburbRepository {
    async fn save_suburb(&self, suburb: Suburb) -> AppResult<()> {
        let mut suburbs = self.suburbs.lock().await;
        suburbs.retain(|existing| existing.id() != suburb.id());
        suburbs.push(suburb);
        Ok(())
    }

    async fn find_suburb(&self, suburb_id: SuburbId) -> AppResult<Option<Suburb>> {
        Ok(self
            .suburbs
            .lock()
            .await
            .iter()
            .find(|suburb| suburb.id() == suburb_id)
            .cloned())
    }

    async fn find_suburb_by_name(&self, name: &str) -> AppResult<Option<Suburb>> {
        Ok(self
            .suburbs
            .lock()
            .await
            .iter()
            .find(|suburb| suburb.matches_name(name))
            .cloned())
    }

    async fn list_suburbs(&self, active_only: bool) -> AppResult<Vec<Suburb>> {
        Ok(self
            .suburbs
            .lock()
            .await
            .iter()
            .filter(|suburb| !active_only || suburb.is_active())
            .cloned()
            .collect())
    }
}
