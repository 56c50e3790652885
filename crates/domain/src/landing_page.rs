use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use pagecraft_core::{AppError, AppResult, LandingPageId, NonEmptyString};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::PageDocument;

/// Maximum slug length.
pub const SLUG_MAX_LENGTH: usize = 64;
/// Maximum page name length.
pub const PAGE_NAME_MAX_LENGTH: usize = 128;
/// Maximum SEO title length.
pub const META_TITLE_MAX_LENGTH: usize = 256;

static SLUG_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").ok());

/// Publication state of a landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// Editable, not publicly reachable.
    #[default]
    Draft,
    /// Publicly reachable under its slug.
    Published,
    /// Retired; kept for lead history.
    Archived,
}

impl PageStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl FromStr for PageStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(AppError::Validation(format!("unknown page status '{value}'"))),
        }
    }
}

/// Page purpose; selects the starting template and lead handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    /// Property appraisal request.
    #[default]
    Appraisal,
    /// Downloadable guide in exchange for contact details.
    LeadMagnet,
    /// Newsletter signup.
    Newsletter,
    /// Webinar or event registration.
    Webinar,
    /// Property management inquiry.
    Inquiry,
    /// Blank canvas.
    Custom,
}

impl PageType {
    /// Every page type in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Appraisal,
        Self::LeadMagnet,
        Self::Newsletter,
        Self::Webinar,
        Self::Inquiry,
        Self::Custom,
    ];

    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appraisal => "appraisal",
            Self::LeadMagnet => "lead_magnet",
            Self::Newsletter => "newsletter",
            Self::Webinar => "webinar",
            Self::Inquiry => "inquiry",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for PageType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "appraisal" => Ok(Self::Appraisal),
            "lead_magnet" => Ok(Self::LeadMagnet),
            "newsletter" => Ok(Self::Newsletter),
            "webinar" => Ok(Self::Webinar),
            "inquiry" => Ok(Self::Inquiry),
            "custom" => Ok(Self::Custom),
            _ => Err(AppError::Validation(format!("unknown page type '{value}'"))),
        }
    }
}

/// Validated url slug of a landing page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageSlug(String);

impl PageSlug {
    /// Creates a validated slug.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_owned();
        if value.is_empty() || value.len() > SLUG_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "slug must be between 1 and {SLUG_MAX_LENGTH} characters"
            )));
        }

        let matches = SLUG_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(value.as_str()));
        if !matches {
            return Err(AppError::Validation(
                "slug must only contain lowercase letters, numbers, and hyphens".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the slug text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for PageSlug {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSlug> for String {
    fn from(value: PageSlug) -> Self {
        value.0
    }
}

/// Optional SEO metadata of a page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageSeo {
    /// Document title override.
    pub meta_title: Option<String>,
    /// Meta description.
    pub meta_description: Option<String>,
    /// Social preview image.
    pub og_image_url: Option<String>,
}

impl PageSeo {
    /// Validates field lengths.
    pub fn validate(&self) -> AppResult<()> {
        if self
            .meta_title
            .as_deref()
            .is_some_and(|title| title.chars().count() > META_TITLE_MAX_LENGTH)
        {
            return Err(AppError::Validation(format!(
                "meta title must be at most {META_TITLE_MAX_LENGTH} characters"
            )));
        }

        Ok(())
    }
}

/// A publishable landing page owning one page document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingPage {
    id: LandingPageId,
    slug: PageSlug,
    name: NonEmptyString,
    status: PageStatus,
    page_type: PageType,
    seo: PageSeo,
    document: PageDocument,
    views: i64,
    submissions: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

impl LandingPage {
    /// Creates a new draft page.
    pub fn new(
        slug: PageSlug,
        name: impl Into<String>,
        page_type: PageType,
        document: PageDocument,
    ) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: LandingPageId::new(),
            slug,
            name: validate_page_name(name)?,
            status: PageStatus::Draft,
            page_type,
            seo: PageSeo::default(),
            document,
            views: 0,
            submissions: 0,
            created_at: now,
            updated_at: now,
            published_at: None,
        })
    }

    /// Restores a page from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: LandingPageId,
        slug: PageSlug,
        name: impl Into<String>,
        status: PageStatus,
        page_type: PageType,
        seo: PageSeo,
        document: PageDocument,
        counters: (i64, i64),
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        published_at: Option<DateTime<Utc>>,
    ) -> AppResult<Self> {
        let (views, submissions) = counters;
        Ok(Self {
            id,
            slug,
            name: NonEmptyString::new(name)?,
            status,
            page_type,
            seo,
            document,
            views,
            submissions,
            created_at,
            updated_at,
            published_at,
        })
    }

    /// Returns page id.
    #[must_use]
    pub fn id(&self) -> LandingPageId {
        self.id
    }

    /// Returns url slug.
    #[must_use]
    pub fn slug(&self) -> &PageSlug {
        &self.slug
    }

    /// Returns display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns publication state.
    #[must_use]
    pub fn status(&self) -> PageStatus {
        self.status
    }

    /// Returns page purpose.
    #[must_use]
    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    /// Returns SEO metadata.
    #[must_use]
    pub fn seo(&self) -> &PageSeo {
        &self.seo
    }

    /// Returns page content.
    #[must_use]
    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    /// Returns view counter.
    #[must_use]
    pub fn views(&self) -> i64 {
        self.views
    }

    /// Returns submission counter.
    #[must_use]
    pub fn submissions(&self) -> i64 {
        self.submissions
    }

    /// Returns creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns first publication timestamp of the current publication.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Returns whether the page is publicly reachable.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == PageStatus::Published
    }

    /// Renames the page.
    pub fn rename(&mut self, name: impl Into<String>) -> AppResult<()> {
        self.name = validate_page_name(name)?;
        self.touch();
        Ok(())
    }

    /// Changes the url slug.
    pub fn change_slug(&mut self, slug: PageSlug) {
        self.slug = slug;
        self.touch();
    }

    /// Replaces SEO metadata.
    pub fn set_seo(&mut self, seo: PageSeo) -> AppResult<()> {
        seo.validate()?;
        self.seo = seo;
        self.touch();
        Ok(())
    }

    /// Replaces the page document wholesale.
    pub fn replace_document(&mut self, document: PageDocument) {
        self.document = document;
        self.touch();
    }

    /// Makes the page publicly reachable.
    pub fn publish(&mut self) -> AppResult<()> {
        if self.status == PageStatus::Archived {
            return Err(AppError::Conflict(format!(
                "archived page '{}' cannot be published",
                self.slug.as_str()
            )));
        }

        if self.status != PageStatus::Published {
            self.status = PageStatus::Published;
            self.published_at = Some(Utc::now());
            self.touch();
        }

        Ok(())
    }

    /// Returns the page to draft.
    pub fn unpublish(&mut self) {
        self.status = PageStatus::Draft;
        self.published_at = None;
        self.touch();
    }

    /// Retires the page.
    pub fn archive(&mut self) {
        self.status = PageStatus::Archived;
        self.published_at = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn validate_page_name(name: impl Into<String>) -> AppResult<NonEmptyString> {
    let name = NonEmptyString::new(name)?;
    if name.as_str().chars().count() > PAGE_NAME_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "page name must be at most {PAGE_NAME_MAX_LENGTH} characters"
        )));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::{LandingPage, PageSlug, PageStatus, PageType};
    use crate::PageDocument;

    fn draft_page() -> LandingPage {
        let slug = PageSlug::new("free-appraisal").unwrap_or_else(|_| unreachable!());
        LandingPage::new(slug, "Free Appraisal", PageType::Appraisal, PageDocument::default())
            .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn slug_rejects_uppercase_and_spaces() {
        assert!(PageSlug::new("Free Appraisal").is_err());
        assert!(PageSlug::new("free_appraisal").is_err());
        assert!(PageSlug::new("free-appraisal-2024").is_ok());
    }

    #[test]
    fn slug_rejects_overlong_values() {
        assert!(PageSlug::new("a".repeat(65)).is_err());
        assert!(PageSlug::new("a".repeat(64)).is_ok());
    }

    #[test]
    fn page_name_length_is_bounded() {
        let slug = PageSlug::new("page").unwrap_or_else(|_| unreachable!());
        let result = LandingPage::new(
            slug,
            "n".repeat(129),
            PageType::Custom,
            PageDocument::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn publish_sets_timestamp_and_unpublish_clears_it() {
        let mut page = draft_page();
        assert_eq!(page.status(), PageStatus::Draft);

        assert!(page.publish().is_ok());
        assert!(page.is_published());
        assert!(page.published_at().is_some());

        page.unpublish();
        assert_eq!(page.status(), PageStatus::Draft);
        assert!(page.published_at().is_none());
    }

    #[test]
    fn archived_page_cannot_be_published() {
        let mut page = draft_page();
        page.archive();
        assert!(page.publish().is_err());
    }

    #[test]
    fn page_type_round_trips_storage_value() {
        for page_type in PageType::ALL {
            assert_eq!(page_type.as_str().parse::<PageType>().ok(), Some(page_type));
        }
    }
}
