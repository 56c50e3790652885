use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagecraft_application::{LandingPageRepository, PageListQuery};
use pagecraft_core::{AppError, AppResult, LandingPageId};
use pagecraft_domain::{LandingPage, PageDocument, PageSeo, PageSlug, PageStatus, PageType};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed repository for landing pages.
#[derive(Clone)]
pub struct PostgresLandingPageRepository {
    pool: PgPool,
}

impl PostgresLandingPageRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn increment(&self, column: &'static str, page_id: LandingPageId) -> AppResult<()> {
        let statement = format!("UPDATE landing_pages SET {column} = {column} + 1 WHERE id = $1");
        sqlx::query(&statement)
            .bind(page_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to increment page {column}: {error}"))
            })?;
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct LandingPageRow {
    id: uuid::Uuid,
    slug: String,
    name: String,
    status: String,
    page_type: String,
    meta_title: Option<String>,
    meta_description: Option<String>,
    og_image_url: Option<String>,
    document: Json<PageDocument>,
    views: i64,
    submissions: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

impl LandingPageRow {
    fn into_page(self) -> AppResult<LandingPage> {
        LandingPage::restore(
            LandingPageId::from_uuid(self.id),
            PageSlug::new(self.slug)?,
            self.name,
            self.status.parse::<PageStatus>()?,
            self.page_type.parse::<PageType>()?,
            PageSeo {
                meta_title: self.meta_title,
                meta_description: self.meta_description,
                og_image_url: self.og_image_url,
            },
            self.document.0,
            (self.views, self.submissions),
            self.created_at,
            self.updated_at,
            self.published_at,
        )
    }
}

const PAGE_COLUMNS: &str = "id, slug, name, status, page_type, meta_title, meta_description, \
     og_image_url, document, views, submissions, created_at, updated_at, published_at";

#[async_trait]
impl LandingPageRepository for PostgresLandingPageRepository {
    async fn save_page(&self, page: LandingPage) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO landing_pages (
                id, slug, name, status, page_type, meta_title, meta_description,
                og_image_url, document, created_at, updated_at, published_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id)
            DO UPDATE SET
                slug = EXCLUDED.slug,
                name = EXCLUDED.name,
                status = EXCLUDED.status,
                page_type = EXCLUDED.page_type,
                meta_title = EXCLUDED.meta_title,
                meta_description = EXCLUDED.meta_description,
                og_image_url = EXCLUDED.og_image_url,
                document = EXCLUDED.document,
                updated_at = EXCLUDED.updated_at,
                published_at = EXCLUDED.published_at
            "#,
        )
        .bind(page.id().as_uuid())
        .bind(page.slug().as_str())
        .bind(page.name())
        .bind(page.status().as_str())
        .bind(page.page_type().as_str())
        .bind(page.seo().meta_title.as_deref())
        .bind(page.seo().meta_description.as_deref())
        .bind(page.seo().og_image_url.as_deref())
        .bind(Json(page.document()))
        .bind(page.created_at())
        .bind(page.updated_at())
        .bind(page.published_at())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23505")
                {
                    return Err(AppError::Conflict(format!(
                        "slug '{}' is already in use",
                        page.slug().as_str()
                    )));
                }

                Err(AppError::Internal(format!(
                    "failed to save landing page: {error}"
                )))
            }
        }
    }

    async fn find_page(&self, page_id: LandingPageId) -> AppResult<Option<LandingPage>> {
        let statement = format!("SELECT {PAGE_COLUMNS} FROM landing_pages WHERE id = $1");
        sqlx::query_as::<_, LandingPageRow>(&statement)
            .bind(page_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find landing page: {error}")))?
            .map(LandingPageRow::into_page)
            .transpose()
    }

    async fn find_page_by_slug(&self, slug: &str) -> AppResult<Option<LandingPage>> {
        let statement = format!("SELECT {PAGE_COLUMNS} FROM landing_pages WHERE slug = $1");
        sqlx::query_as::<_, LandingPageRow>(&statement)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to find landing page by slug: {error}"))
            })?
            .map(LandingPageRow::into_page)
            .transpose()
    }

    async fn list_pages(&self, query: PageListQuery) -> AppResult<Vec<LandingPage>> {
        let statement = format!(
            "SELECT {PAGE_COLUMNS} FROM landing_pages \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY updated_at DESC"
        );
        let rows = sqlx::query_as::<_, LandingPageRow>(&statement)
            .bind(query.status.map(|status| status.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list landing pages: {error}"))
            })?;

        rows.into_iter().map(LandingPageRow::into_page).collect()
    }

    async fn delete_page(&self, page_id: LandingPageId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM landing_pages WHERE id = $1")
            .bind(page_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete landing page: {error}"))
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_views(&self, page_id: LandingPageId) -> AppResult<()> {
        self.increment("views", page_id).await
    }

    async fn increment_submissions(&self, page_id: LandingPageId) -> AppResult<()> {
        self.increment("submissions", page_id).await
    }
}

#[cfg(test)]
mod tests;
