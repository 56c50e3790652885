use async_trait::async_trait;
use pagecraft_core::AppResult;
use pagecraft_domain::AnalyticsEvent;

/// Port receiving funnel events. Callers never let a failure reach the visitor.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Records one event.
    async fn record(&self, event: AnalyticsEvent) -> AppResult<()>;
}
