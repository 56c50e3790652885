mod analytics;
mod notifications;
mod repository;
mod submission;

pub use analytics::AnalyticsSink;
pub use notifications::{EmailService, LeadWebhookDispatcher, LeadWebhookEvent};
pub use repository::{
    AnalyticsRepository, BlockTemplateRepository, LandingPageRepository, LeadListQuery,
    LeadRepository, PageListQuery, SuburbRepository,
};
pub use submission::{SubmissionContext, SubmissionReceipt, SubmissionSink};
