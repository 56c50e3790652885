use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagecraft_application::AnalyticsRepository;
use pagecraft_core::{AppError, AppResult, LandingPageId};
use pagecraft_domain::{AnalyticsEvent, AnalyticsEventType};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed append-only store for funnel events.
#[derive(Clone)]
pub struct PostgresAnalyticsRepository {
    pool: PgPool,
}

impl PostgresAnalyticsRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AnalyticsEventRow {
    landing_page_id: Option<uuid::Uuid>,
    session_id: Option<String>,
    event_type: String,
    event_data: Json<Map<String, Value>>,
    step_number: Option<i16>,
    created_at: DateTime<Utc>,
}

impl AnalyticsEventRow {
    fn into_event(self) -> AppResult<AnalyticsEvent> {
        let step_number = self
            .step_number
            .map(u8::try_from)
            .transpose()
            .map_err(|error| AppError::Internal(format!("invalid stored step number: {error}")))?;

        Ok(AnalyticsEvent::restore(
            self.landing_page_id.map(LandingPageId::from_uuid),
            self.session_id,
            self.event_type.parse::<AnalyticsEventType>()?,
            self.event_data.0,
            step_number,
            self.created_at,
        ))
    }
}

#[async_trait]
impl AnalyticsRepository for PostgresAnalyticsRepository {
    async fn append_event(&self, event: AnalyticsEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO analytics_events (
                landing_page_id, session_id, event_type, event_data, step_number, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.landing_page_id().map(|page_id| page_id.as_uuid()))
        .bind(event.session_id())
        .bind(event.event_type().as_str())
        .bind(Json(event.event_data()))
        .bind(event.step_number().map(i16::from))
        .bind(event.created_at())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append analytics event: {error}")))?;

        Ok(())
    }

    async fn list_events(
        &self,
        page_id: LandingPageId,
        event_type: Option<AnalyticsEventType>,
    ) -> AppResult<Vec<AnalyticsEvent>> {
        let rows = sqlx::query_as::<_, AnalyticsEventRow>(
            r#"
            SELECT landing_page_id, session_id, event_type, event_data, step_number, created_at
            FROM analytics_events
            WHERE landing_page_id = $1
                AND ($2::TEXT IS NULL OR event_type = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(page_id.as_uuid())
        .bind(event_type.map(|event_type| event_type.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list analytics events: {error}")))?;

        rows.into_iter().map(AnalyticsEventRow::into_event).collect()
    }
}
