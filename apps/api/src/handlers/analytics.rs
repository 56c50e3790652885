use axum::Json;
use axum::extract::{Path, Query, State};
use pagecraft_application::AnalyticsSummary;
use pagecraft_core::LandingPageId;

use crate::dto::{AnalyticsEventResponse, AnalyticsEventsQuery};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn analytics_summary_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> ApiResult<Json<AnalyticsSummary>> {
    let summary = state
        .analytics_service
        .summary(LandingPageId::parse(&page_id)?)
        .await?;
    Ok(Json(summary))
}

pub async fn analytics_events_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    Query(query): Query<AnalyticsEventsQuery>,
) -> ApiResult<Json<Vec<AnalyticsEventResponse>>> {
    let events = state
        .analytics_service
        .list_events(LandingPageId::parse(&page_id)?, query.event_type()?)
        .await?
        .into_iter()
        .map(AnalyticsEventResponse::from)
        .collect();
    Ok(Json(events))
}
