use std::collections::BTreeMap;
use std::sync::Arc;

use pagecraft_core::{AppError, AppResult, LandingPageId};
use pagecraft_domain::{
    BlockConfig, LandingPage, PageDocument, PageSeo, PageSlug, PageTemplate, PageType,
    all_page_templates, page_template,
};
use tracing::{debug, info, warn};

use crate::document_editor::{DocumentEditor, EditorCommand};
use crate::document_inspection::{DocumentIndex, inspect_document, issues_error};
use crate::page_ports::{LandingPageRepository, PageListQuery};
use crate::renderer::{BlockRenderer, PageView, RenderOptions};
use crate::{BlockCategory, BlockMetadata, BlockRegistry};

/// Input for creating a page.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePageInput {
    /// Url slug.
    pub slug: String,
    /// Admin-facing name.
    pub name: String,
    /// Page type; selects the starting template.
    pub page_type: PageType,
    /// Explicit document replacing the template.
    pub document: Option<PageDocument>,
}

/// Partial page update. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePageInput {
    /// New name.
    pub name: Option<String>,
    /// New slug.
    pub slug: Option<String>,
    /// New SEO metadata.
    pub seo: Option<PageSeo>,
    /// New document.
    pub document: Option<PageDocument>,
}

/// Page after a batch of editor commands.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEdit {
    /// Saved page.
    pub page: LandingPage,
    /// Id touched by each command, in order.
    pub touched: Vec<String>,
}

/// Application service for authoring and serving landing pages.
#[derive(Clone)]
pub struct LandingPageService {
    repository: Arc<dyn LandingPageRepository>,
    registry: Arc<BlockRegistry>,
}

impl LandingPageService {
    /// Creates a landing page service.
    #[must_use]
    pub fn new(repository: Arc<dyn LandingPageRepository>, registry: Arc<BlockRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// Returns the block registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// Checks a document for blocking issues and logs warnings.
    pub fn inspect(&self, document: &PageDocument) -> AppResult<DocumentIndex> {
        let index =
            inspect_document(&self.registry, document).map_err(|issues| issues_error(&issues))?;
        for warning in index.warnings() {
            warn!(block_id = ?warning.block_id, "{}", warning.message);
        }

        Ok(index)
    }

    /// Creates a draft page seeded from its type's template.
    pub async fn create_page(&self, input: CreatePageInput) -> AppResult<LandingPage> {
        let slug = PageSlug::new(input.slug)?;
        self.ensure_slug_free(&slug, None).await?;

        let document = input
            .document
            .unwrap_or_else(|| page_template(input.page_type).document);
        self.inspect(&document)?;

        let page = LandingPage::new(slug, input.name, input.page_type, document)?;
        self.repository.save_page(page.clone()).await?;
        info!(page_id = %page.id(), slug = page.slug().as_str(), "landing page created");
        Ok(page)
    }

    /// Returns one page by id.
    pub async fn get_page(&self, page_id: LandingPageId) -> AppResult<LandingPage> {
        self.repository
            .find_page(page_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("landing page '{page_id}'")))
    }

    /// Lists pages.
    pub async fn list_pages(&self, query: PageListQuery) -> AppResult<Vec<LandingPage>> {
        self.repository.list_pages(query).await
    }

    /// Applies a partial update.
    pub async fn update_page(
        &self,
        page_id: LandingPageId,
        input: UpdatePageInput,
    ) -> AppResult<LandingPage> {
        let mut page = self.get_page(page_id).await?;

        if let Some(name) = input.name {
            page.rename(name)?;
        }
        if let Some(slug) = input.slug {
            let slug = PageSlug::new(slug)?;
            if slug != *page.slug() {
                self.ensure_slug_free(&slug, Some(page_id)).await?;
                page.change_slug(slug);
            }
        }
        if let Some(seo) = input.seo {
            page.set_seo(seo)?;
        }
        if let Some(document) = input.document {
            self.inspect(&document)?;
            page.replace_document(document);
        }

        self.repository.save_page(page.clone()).await?;
        Ok(page)
    }

    /// Applies editor commands in order and saves the result when the document stays valid.
    pub async fn edit_document(
        &self,
        page_id: LandingPageId,
        commands: Vec<EditorCommand>,
    ) -> AppResult<DocumentEdit> {
        let mut page = self.get_page(page_id).await?;
        let mut editor = DocumentEditor::new(Arc::clone(&self.registry), page.document().clone());

        let touched = commands
            .into_iter()
            .map(|command| editor.apply(command))
            .collect::<AppResult<Vec<_>>>()?;

        let document = editor.into_document();
        self.inspect(&document)?;
        page.replace_document(document);
        self.repository.save_page(page.clone()).await?;
        debug!(page_id = %page_id, commands = touched.len(), "page document edited");

        Ok(DocumentEdit { page, touched })
    }

    /// Publishes a page once its document is valid.
    pub async fn publish_page(&self, page_id: LandingPageId) -> AppResult<LandingPage> {
        let mut page = self.get_page(page_id).await?;
        self.inspect(page.document())?;
        page.publish()?;

        self.repository.save_page(page.clone()).await?;
        info!(page_id = %page_id, slug = page.slug().as_str(), "landing page published");
        Ok(page)
    }

    /// Returns a page to draft.
    pub async fn unpublish_page(&self, page_id: LandingPageId) -> AppResult<LandingPage> {
        let mut page = self.get_page(page_id).await?;
        page.unpublish();
        self.repository.save_page(page.clone()).await?;
        Ok(page)
    }

    /// Archives a page.
    pub async fn archive_page(&self, page_id: LandingPageId) -> AppResult<LandingPage> {
        let mut page = self.get_page(page_id).await?;
        page.archive();
        self.repository.save_page(page.clone()).await?;
        Ok(page)
    }

    /// Deletes a page.
    pub async fn delete_page(&self, page_id: LandingPageId) -> AppResult<()> {
        if self.repository.delete_page(page_id).await? {
            info!(page_id = %page_id, "landing page deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(format!("landing page '{page_id}'")))
        }
    }

    /// Resolves a published page without counting a view.
    pub async fn resolve_published(&self, slug: &str) -> AppResult<LandingPage> {
        self.repository
            .find_page_by_slug(slug)
            .await?
            .filter(LandingPage::is_published)
            .ok_or_else(|| AppError::NotFound(format!("landing page '{slug}'")))
    }

    /// Returns a published page for visitors and counts the view.
    pub async fn published_page(&self, slug: &str) -> AppResult<LandingPage> {
        let page = self.resolve_published(slug).await?;

        if let Err(error) = self.repository.increment_views(page.id()).await {
            warn!(page_id = %page.id(), %error, "failed to count page view");
        }

        Ok(page)
    }

    /// Returns a page in any status for admin preview.
    pub async fn preview_page(&self, slug: &str) -> AppResult<LandingPage> {
        self.repository
            .find_page_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("landing page '{slug}'")))
    }

    /// Renders a page document.
    #[must_use]
    pub fn render(&self, page: &LandingPage, options: RenderOptions) -> PageView {
        BlockRenderer::new(Arc::clone(&self.registry)).render_page(page.document(), options, None)
    }

    /// Returns registered block metadata grouped by category.
    #[must_use]
    pub fn block_catalog(&self) -> BTreeMap<BlockCategory, Vec<BlockMetadata>> {
        self.registry
            .get_by_category()
            .into_iter()
            .map(|(category, entries)| (category, entries.into_iter().cloned().collect()))
            .collect()
    }

    /// Returns a fresh default config for a block type.
    pub fn default_block(&self, block_type: &str) -> AppResult<BlockConfig> {
        self.registry
            .create_default_config(block_type)
            .ok_or_else(|| AppError::NotFound(format!("block type '{block_type}'")))
    }

    /// Returns every page template.
    #[must_use]
    pub fn templates(&self) -> Vec<PageTemplate> {
        all_page_templates()
    }

    /// Creates one draft page per template whose default slug is still free.
    pub async fn seed_templates(&self) -> AppResult<usize> {
        let mut created = 0;
        for template in all_page_templates() {
            if self
                .repository
                .find_page_by_slug(template.default_slug_prefix)
                .await?
                .is_some()
            {
                continue;
            }

            self.create_page(CreatePageInput {
                slug: template.default_slug_prefix.to_owned(),
                name: template.name.to_owned(),
                page_type: template.page_type,
                document: Some(template.document),
            })
            .await?;
            created += 1;
        }

        Ok(created)
    }

    async fn ensure_slug_free(
        &self,
        slug: &PageSlug,
        owner: Option<LandingPageId>,
    ) -> AppResult<()> {
        match self.repository.find_page_by_slug(slug.as_str()).await? {
            Some(existing) if Some(existing.id()) != owner => Err(AppError::Conflict(format!(
                "slug '{}' is already in use",
                slug.as_str()
            ))),
            _ => Ok(()),
        }
    }
}
