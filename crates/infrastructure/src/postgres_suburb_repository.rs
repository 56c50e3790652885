use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagecraft_application::SuburbRepository;
use pagecraft_core::{AppError, AppResult, SuburbId};
use pagecraft_domain::{Suburb, SuburbDetails};
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed repository for suburb statistics.
#[derive(Clone)]
pub struct PostgresSuburbRepository {
    pool: PgPool,
}

impl PostgresSuburbRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SuburbRow {
    id: uuid::Uuid,
    name: String,
    region: Option<String>,
    city: Option<String>,
    homes_sold_last_year: i64,
    median_price: Option<i64>,
    average_days_on_market: Option<i64>,
    custom_text: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SuburbRow {
    fn into_suburb(self) -> AppResult<Suburb> {
        let details = SuburbDetails {
            name: self.name,
            region: self.region,
            city: self.city,
            homes_sold_last_year: stored_count(self.homes_sold_last_year)?,
            median_price: self.median_price.map(stored_count).transpose()?,
            average_days_on_market: self.average_days_on_market.map(stored_count).transpose()?,
            custom_text: self.custom_text,
            is_active: self.is_active,
        };

        Suburb::restore(
            SuburbId::from_uuid(self.id),
            details,
            self.created_at,
            self.updated_at,
        )
    }
}

fn stored_count(value: i64) -> AppResult<u32> {
    u32::try_from(value)
        .map_err(|_| AppError::Internal(format!("stored suburb statistic {value} is out of range")))
}

const SELECT_SUBURB: &str = r#"
    SELECT id, name, region, city, homes_sold_last_year, median_price,
           average_days_on_market, custom_text, is_active, created_at, updated_at
    FROM suburbs
"#;

#[async_trait]
impl SuburbRepository for PostgresSuburbRepository {
    async fn save_suburb(&self, suburb: Suburb) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO suburbs (
                id, name, region, city, homes_sold_last_year, median_price,
                average_days_on_market, custom_text, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id)
            DO UPDATE SET
                name = EXCLUDED.name,
                region = EXCLUDED.region,
                city = EXCLUDED.city,
                homes_sold_last_year = EXCLUDED.homes_sold_last_year,
                median_price = EXCLUDED.median_price,
                average_days_on_market = EXCLUDED.average_days_on_market,
                custom_text = EXCLUDED.custom_text,
                is_active = EXCLUDED.is_active,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(suburb.id().as_uuid())
        .bind(suburb.name())
        .bind(suburb.region())
        .bind(suburb.city())
        .bind(i64::from(suburb.homes_sold_last_year()))
        .bind(suburb.median_price().map(i64::from))
        .bind(suburb.average_days_on_market().map(i64::from))
        .bind(suburb.custom_text())
        .bind(suburb.is_active())
        .bind(suburb.created_at())
        .bind(suburb.updated_at())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23505")
                {
                    return Err(AppError::Conflict(format!(
                        "suburb '{}' already exists",
                        suburb.name()
                    )));
                }

                Err(AppError::Internal(format!("failed to save suburb: {error}")))
            }
        }
    }

    async fn find_suburb(&self, suburb_id: SuburbId) -> AppResult<Option<Suburb>> {
        sqlx::query_as::<_, SuburbRow>(&format!("{SELECT_SUBURB} WHERE id = $1"))
            .bind(suburb_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find suburb: {error}")))?
            .map(SuburbRow::into_suburb)
            .transpose()
    }

    async fn find_suburb_by_name(&self, name: &str) -> AppResult<Option<Suburb>> {
        sqlx::query_as::<_, SuburbRow>(&format!(
            "{SELECT_SUBURB} WHERE lower(name) = lower($1)"
        ))
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find suburb: {error}")))?
        .map(SuburbRow::into_suburb)
        .transpose()
    }

    async fn list_suburbs(&self, active_only: bool) -> AppResult<Vec<Suburb>> {
        let rows = sqlx::query_as::<_, SuburbRow>(&format!(
            "{SELECT_SUBURB} WHERE ($1 = FALSE OR is_active) ORDER BY name ASC"
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list suburbs: {error}")))?;

        rows.into_iter().map(SuburbRow::into_suburb).collect()
    }
}
