use std::sync::Arc;

use pagecraft_application::{
    AnalyticsRepository, BlockTemplateRepository, LandingPageRepository, LeadRepository,
    SuburbRepository,
};
use pagecraft_infrastructure::{
    InMemoryAnalyticsRepository, InMemoryBlockTemplateRepository, InMemoryLandingPageRepository,
    InMemoryLeadRepository, InMemorySuburbRepository, PostgresAnalyticsRepository,
    PostgresBlockTemplateRepository, PostgresLandingPageRepository, PostgresLeadRepository,
    PostgresSuburbRepository,
};
use sqlx::PgPool;

pub(super) struct RepositorySet {
    pub(super) pages: Arc<dyn LandingPageRepository>,
    pub(super) leads: Arc<dyn LeadRepository>,
    pub(super) analytics: Arc<dyn AnalyticsRepository>,
    pub(super) block_templates: Arc<dyn BlockTemplateRepository>,
    pub(super) suburbs: Arc<dyn SuburbRepository>,
}

impl RepositorySet {
    pub(super) fn postgres(pool: PgPool) -> Self {
        Self {
            pages: Arc::new(PostgresLandingPageRepository::new(pool.clone())),
            leads: Arc::new(PostgresLeadRepository::new(pool.clone())),
            analytics: Arc::new(PostgresAnalyticsRepository::new(pool.clone())),
            block_templates: Arc::new(PostgresBlockTemplateRepository::new(pool.clone())),
            suburbs: Arc::new(PostgresSuburbRepository::new(pool)),
        }
    }

    pub(super) fn in_memory() -> Self {
        Self {
            pages: Arc::new(InMemoryLandingPageRepository::new()),
            leads: Arc::new(InMemoryLeadRepository::new()),
            analytics: Arc::new(InMemoryAnalyticsRepository::new()),
            block_templates: Arc::new(InMemoryBlockTemplateRepository::new()),
            suburbs: Arc::new(InMemorySuburbRepository::new()),
        }
    }
}
