mod database;
mod email;
mod repositories;

pub use database::connect_and_migrate;

use std::sync::Arc;
use std::time::Duration;

use pagecraft_application::{
    AnalyticsService, BlockRegistry, BlockTemplateService, LandingPageService, LeadService,
    SuburbService,
};
use pagecraft_core::AppError;
use pagecraft_infrastructure::HttpLeadWebhookDispatcher;
use sqlx::PgPool;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::state::AppState;

use self::repositories::RepositorySet;

pub fn build_app_state(pool: Option<PgPool>, config: &ApiConfig) -> Result<AppState, AppError> {
    let repositories = match pool {
        Some(pool) => RepositorySet::postgres(pool),
        None => {
            info!("DATABASE_URL not set; using in-memory storage");
            RepositorySet::in_memory()
        }
    };

    let registry = Arc::new(BlockRegistry::builtin());
    let webhook_dispatcher = Arc::new(HttpLeadWebhookDispatcher::new(
        build_http_client(Duration::from_millis(config.lead_webhook_timeout_ms))?,
        config.lead_webhook_max_attempts,
        config.lead_webhook_backoff_ms,
    ));

    Ok(AppState {
        landing_page_service: LandingPageService::new(
            repositories.pages.clone(),
            registry.clone(),
        ),
        lead_service: LeadService::new(repositories.pages, repositories.leads, registry.clone())
            .with_webhook_dispatcher(webhook_dispatcher)
            .with_email_service(email::build_email_service(config)?),
        analytics_service: AnalyticsService::new(repositories.analytics),
        block_template_service: BlockTemplateService::new(repositories.block_templates, registry),
        suburb_service: SuburbService::new(repositories.suburbs),
        admin_token: Arc::from(config.admin_token.as_str()),
    })
}

/// Outbound client; every request is bounded by `timeout`.
fn build_http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))
}
