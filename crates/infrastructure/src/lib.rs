//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_email_service;
mod http_lead_webhook_dispatcher;
mod http_submission_sink;
mod in_memory_repositories;
mod postgres_analytics_repository;
mod postgres_block_template_repository;
mod postgres_landing_page_repository;
mod postgres_lead_repository;
mod postgres_suburb_repository;
mod smtp_email_service;
mod tracing_analytics_sink;

pub use console_email_service::ConsoleEmailService;
pub use http_lead_webhook_dispatcher::HttpLeadWebhookDispatcher;
pub use http_submission_sink::HttpSubmissionSink;
pub use in_memory_repositories::{
    InMemoryAnalyticsRepository, InMemoryBlockTemplateRepository, InMemoryLandingPageRepository,
    InMemoryLeadRepository, InMemorySuburbRepository,
};
pub use postgres_analytics_repository::PostgresAnalyticsRepository;
pub use postgres_block_template_repository::PostgresBlockTemplateRepository;
pub use postgres_landing_page_repository::PostgresLandingPageRepository;
pub use postgres_lead_repository::PostgresLeadRepository;
pub use postgres_suburb_repository::PostgresSuburbRepository;
pub use smtp_email_service::{SmtpEmailConfig, SmtpEmailService};
pub use tracing_analytics_sink::TracingAnalyticsSink;
