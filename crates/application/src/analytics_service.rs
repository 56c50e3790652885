use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use pagecraft_core::{AppResult, LandingPageId};
use pagecraft_domain::{AnalyticsEvent, AnalyticsEventType};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::page_ports::{AnalyticsRepository, AnalyticsSink};

/// Input for recording one funnel event.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEventInput {
    /// Source page.
    pub landing_page_id: Option<LandingPageId>,
    /// Visitor session.
    pub session_id: Option<String>,
    /// Event kind.
    pub event_type: AnalyticsEventType,
    /// Free-form event details.
    pub event_data: Map<String, Value>,
    /// Step for `step_complete`.
    pub step_number: Option<u8>,
}

/// Funnel totals of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// `page_view` count.
    pub total_views: u64,
    /// `form_submit` count.
    pub total_submissions: u64,
    /// Submissions per hundred views.
    pub conversion_rate: f64,
    /// `step_complete` counts by step number.
    pub step_completions: BTreeMap<u8, u64>,
}

/// Application service for funnel analytics.
#[derive(Clone)]
pub struct AnalyticsService {
    repository: Arc<dyn AnalyticsRepository>,
}

impl AnalyticsService {
    /// Creates an analytics service.
    #[must_use]
    pub fn new(repository: Arc<dyn AnalyticsRepository>) -> Self {
        Self { repository }
    }

    /// Validates and stores one event.
    pub async fn record_event(&self, input: TrackEventInput) -> AppResult<()> {
        let event = AnalyticsEvent::new(
            input.landing_page_id,
            input.session_id,
            input.event_type,
            input.event_data,
            input.step_number,
        )?;

        self.repository.append_event(event).await
    }

    /// Lists events of one page, newest first.
    pub async fn list_events(
        &self,
        page_id: LandingPageId,
        event_type: Option<AnalyticsEventType>,
    ) -> AppResult<Vec<AnalyticsEvent>> {
        self.repository.list_events(page_id, event_type).await
    }

    /// Aggregates the funnel of one page.
    pub async fn summary(&self, page_id: LandingPageId) -> AppResult<AnalyticsSummary> {
        let events = self.repository.list_events(page_id, None).await?;

        let mut total_views = 0_u64;
        let mut total_submissions = 0_u64;
        let mut step_completions = BTreeMap::new();
        for event in &events {
            match event.event_type() {
                AnalyticsEventType::PageView => total_views += 1,
                AnalyticsEventType::FormSubmit => total_submissions += 1,
                AnalyticsEventType::StepComplete => {
                    if let Some(step) = event.step_number() {
                        *step_completions.entry(step).or_insert(0) += 1;
                    }
                }
                AnalyticsEventType::FormStart | AnalyticsEventType::CtaClick => {}
            }
        }

        let conversion_rate = if total_views == 0 {
            0.0
        } else {
            total_submissions as f64 / total_views as f64 * 100.0
        };

        Ok(AnalyticsSummary {
            total_views,
            total_submissions,
            conversion_rate,
            step_completions,
        })
    }
}

#[async_trait]
impl AnalyticsSink for AnalyticsService {
    async fn record(&self, event: AnalyticsEvent) -> AppResult<()> {
        self.repository.append_event(event).await
    }
}

/// Per-session fire-and-forget event emitter.
///
/// Each event type and step pair is sent once per session; CTA clicks are
/// always sent. Delivery runs on a spawned task and failures are only logged.
pub struct AnalyticsTracker {
    sink: Arc<dyn AnalyticsSink>,
    landing_page_id: Option<LandingPageId>,
    session_id: Option<String>,
    sent: HashSet<(AnalyticsEventType, Option<u8>)>,
}

impl AnalyticsTracker {
    /// Creates a tracker for one visitor session.
    #[must_use]
    pub fn new(
        sink: Arc<dyn AnalyticsSink>,
        landing_page_id: Option<LandingPageId>,
        session_id: Option<String>,
    ) -> Self {
        Self {
            sink,
            landing_page_id,
            session_id,
            sent: HashSet::new(),
        }
    }

    /// Emits one event. Returns whether it was dispatched.
    pub fn track(
        &mut self,
        event_type: AnalyticsEventType,
        step_number: Option<usize>,
        event_data: Map<String, Value>,
    ) -> bool {
        let step_number = match step_number.map(u8::try_from).transpose() {
            Ok(step_number) => step_number,
            Err(_) => {
                debug!(event_type = event_type.as_str(), "analytics step out of range");
                return false;
            }
        };

        let key = (event_type, step_number);
        if event_type != AnalyticsEventType::CtaClick && self.sent.contains(&key) {
            return false;
        }

        let event = match AnalyticsEvent::new(
            self.landing_page_id,
            self.session_id.clone(),
            event_type,
            event_data,
            step_number,
        ) {
            Ok(event) => event,
            Err(error) => {
                debug!(event_type = event_type.as_str(), %error, "analytics event dropped");
                return false;
            }
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(
                event_type = event_type.as_str(),
                "no async runtime, analytics event dropped"
            );
            return false;
        };

        let sink = Arc::clone(&self.sink);
        runtime.spawn(async move {
            if let Err(error) = sink.record(event).await {
                warn!(event_type = event_type.as_str(), %error, "analytics delivery failed");
            }
        });
        self.sent.insert(key);
        true
    }

    /// Returns whether an event type and step pair was already sent.
    #[must_use]
    pub fn has_sent(&self, event_type: AnalyticsEventType, step_number: Option<u8>) -> bool {
        self.sent.contains(&(event_type, step_number))
    }
}
