use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagecraft_application::{LeadListQuery, LeadRepository};
use pagecraft_core::{AppError, AppResult, LandingPageId, LeadId};
use pagecraft_domain::{FieldValueMap, Lead, LeadStatus, PageType, TrackingParams};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed repository for captured leads.
#[derive(Clone)]
pub struct PostgresLeadRepository {
    pool: PgPool,
}

impl PostgresLeadRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct LeadRow {
    id: uuid::Uuid,
    landing_page_id: uuid::Uuid,
    page_type: String,
    form_data: Json<FieldValueMap>,
    tracking: Json<TrackingParams>,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LeadRow {
    fn into_lead(self) -> AppResult<Lead> {
        Ok(Lead::restore(
            LeadId::from_uuid(self.id),
            LandingPageId::from_uuid(self.landing_page_id),
            self.page_type.parse::<PageType>()?,
            self.form_data.0,
            self.tracking.0,
            self.status.parse::<LeadStatus>()?,
            self.notes,
            self.created_at,
            self.updated_at,
        ))
    }
}

#[async_trait]
impl LeadRepository for PostgresLeadRepository {
    async fn save_lead(&self, lead: Lead) -> AppResult<()> {
        let contact = lead.contact();
        sqlx::query(
            r#"
            INSERT INTO leads (
                id, landing_page_id, page_type, email, first_name, last_name, phone,
                form_data, tracking, status, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id)
            DO UPDATE SET
                status = EXCLUDED.status,
                notes = EXCLUDED.notes,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(lead.id().as_uuid())
        .bind(lead.landing_page_id().as_uuid())
        .bind(lead.page_type().as_str())
        .bind(contact.email.as_deref())
        .bind(contact.first_name.as_deref())
        .bind(contact.last_name.as_deref())
        .bind(contact.phone.as_deref())
        .bind(Json(lead.form_data()))
        .bind(Json(lead.tracking()))
        .bind(lead.status().as_str())
        .bind(lead.notes())
        .bind(lead.created_at())
        .bind(lead.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to save lead: {error}")))?;

        Ok(())
    }

    async fn find_lead(&self, lead_id: LeadId) -> AppResult<Option<Lead>> {
        sqlx::query_as::<_, LeadRow>(
            r#"
            SELECT id, landing_page_id, page_type, form_data, tracking, status, notes,
                   created_at, updated_at
            FROM leads
            WHERE id = $1
            "#,
        )
        .bind(lead_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find lead: {error}")))?
        .map(LeadRow::into_lead)
        .transpose()
    }

    async fn list_leads(&self, query: LeadListQuery) -> AppResult<Vec<Lead>> {
        let capped_limit = query.limit.clamp(1, 500) as i64;
        let capped_offset = query.offset.min(100_000) as i64;
        let rows = sqlx::query_as::<_, LeadRow>(
            r#"
            SELECT id, landing_page_id, page_type, form_data, tracking, status, notes,
                   created_at, updated_at
            FROM leads
            WHERE ($1::UUID IS NULL OR landing_page_id = $1)
                AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3
            OFFSET $4
            "#,
        )
        .bind(query.landing_page_id.map(|page_id| page_id.as_uuid()))
        .bind(query.status.map(|status| status.as_str()))
        .bind(capped_limit)
        .bind(capped_offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list leads: {error}")))?;

        rows.into_iter().map(LeadRow::into_lead).collect()
    }
}
