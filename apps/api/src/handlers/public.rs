use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use pagecraft_application::{PageView, RenderOptions};
use tracing::debug;

use crate::dto::{PageResponse, SubmissionAcceptedResponse, SubmitLeadRequest, TrackEventRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn published_page_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PageResponse>> {
    let page = state.landing_page_service.published_page(&slug).await?;
    Ok(Json(PageResponse::try_from(page)?))
}

pub async fn published_page_view_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PageView>> {
    let page = state.landing_page_service.published_page(&slug).await?;
    Ok(Json(
        state
            .landing_page_service
            .render(&page, RenderOptions::live()),
    ))
}

pub async fn submit_lead_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<SubmitLeadRequest>,
) -> ApiResult<(StatusCode, Json<SubmissionAcceptedResponse>)> {
    let page = state.landing_page_service.resolve_published(&slug).await?;
    let lead = state
        .lead_service
        .submit_lead(
            page.id(),
            payload.form_data,
            payload.tracking.unwrap_or_default(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionAcceptedResponse::for_lead(lead.id().to_string())),
    ))
}

pub async fn track_event_handler(
    State(state): State<AppState>,
    Json(payload): Json<TrackEventRequest>,
) -> ApiResult<StatusCode> {
    let input = payload.into_input()?;
    debug!(event_type = input.event_type.as_str(), "tracking event");
    state.analytics_service.record_event(input).await?;
    Ok(StatusCode::ACCEPTED)
}
