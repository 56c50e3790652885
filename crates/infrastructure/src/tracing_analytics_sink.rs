use async_trait::async_trait;
use pagecraft_application::AnalyticsSink;
use pagecraft_core::AppResult;
use pagecraft_domain::AnalyticsEvent;
use tracing::info;

/// Analytics sink writing each event to the log instead of storing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalyticsSink;

#[async_trait]
impl AnalyticsSink for TracingAnalyticsSink {
    async fn record(&self, event: AnalyticsEvent) -> AppResult<()> {
        info!(
            event_type = event.event_type().as_str(),
            page_id = ?event.landing_page_id(),
            session_id = event.session_id(),
            step = event.step_number(),
            "analytics event"
        );
        Ok(())
    }
}
