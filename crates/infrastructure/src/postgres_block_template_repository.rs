use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagecraft_application::BlockTemplateRepository;
use pagecraft_core::{AppError, AppResult, BlockTemplateId};
use pagecraft_domain::{BlockConfig, BlockTemplate};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed repository for the block library.
#[derive(Clone)]
pub struct PostgresBlockTemplateRepository {
    pool: PgPool,
}

impl PostgresBlockTemplateRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BlockTemplateRow {
    id: uuid::Uuid,
    name: String,
    category: String,
    default_config: Json<BlockConfig>,
    is_system: bool,
    created_at: DateTime<Utc>,
}

impl BlockTemplateRow {
    fn into_template(self) -> AppResult<BlockTemplate> {
        BlockTemplate::restore(
            BlockTemplateId::from_uuid(self.id),
            self.name,
            self.category,
            self.default_config.0,
            self.is_system,
            self.created_at,
        )
    }
}

#[async_trait]
impl BlockTemplateRepository for PostgresBlockTemplateRepository {
    async fn save_block_template(&self, template: BlockTemplate) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO block_templates (
                id, name, category, block_type, default_config, is_system, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id)
            DO UPDATE SET
                name = EXCLUDED.name,
                category = EXCLUDED.category,
                block_type = EXCLUDED.block_type,
                default_config = EXCLUDED.default_config,
                is_system = EXCLUDED.is_system
            "#,
        )
        .bind(template.id().as_uuid())
        .bind(template.name())
        .bind(template.category())
        .bind(template.block_type())
        .bind(Json(template.default_config()))
        .bind(template.is_system())
        .bind(template.created_at())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to save block template: {error}")))?;

        Ok(())
    }

    async fn find_block_template(
        &self,
        template_id: BlockTemplateId,
    ) -> AppResult<Option<BlockTemplate>> {
        sqlx::query_as::<_, BlockTemplateRow>(
            r#"
            SELECT id, name, category, default_config, is_system, created_at
            FROM block_templates
            WHERE id = $1
            "#,
        )
        .bind(template_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find block template: {error}")))?
        .map(BlockTemplateRow::into_template)
        .transpose()
    }

    async fn list_block_templates(&self, category: Option<&str>) -> AppResult<Vec<BlockTemplate>> {
        let rows = sqlx::query_as::<_, BlockTemplateRow>(
            r#"
            SELECT id, name, category, default_config, is_system, created_at
            FROM block_templates
            WHERE ($1::TEXT IS NULL OR category = $1)
            ORDER BY is_system DESC, name ASC
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list block templates: {error}")))?;

        rows.into_iter().map(BlockTemplateRow::into_template).collect()
    }
}
