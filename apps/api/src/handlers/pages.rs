use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use pagecraft_core::LandingPageId;

use crate::dto::{CreatePageRequest, PageListQueryRequest, PageResponse, UpdatePageRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_pages_handler(
    State(state): State<AppState>,
    Query(query): Query<PageListQueryRequest>,
) -> ApiResult<Json<Vec<PageResponse>>> {
    let pages = state
        .landing_page_service
        .list_pages(query.into_query()?)
        .await?
        .into_iter()
        .map(PageResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(pages))
}

pub async fn create_page_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreatePageRequest>,
) -> ApiResult<(StatusCode, Json<PageResponse>)> {
    let page = state
        .landing_page_service
        .create_page(payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(PageResponse::try_from(page)?)))
}

pub async fn get_page_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> ApiResult<Json<PageResponse>> {
    let page = state
        .landing_page_service
        .get_page(LandingPageId::parse(&page_id)?)
        .await?;
    Ok(Json(PageResponse::try_from(page)?))
}

pub async fn update_page_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    Json(payload): Json<UpdatePageRequest>,
) -> ApiResult<Json<PageResponse>> {
    let page = state
        .landing_page_service
        .update_page(LandingPageId::parse(&page_id)?, payload.into_input()?)
        .await?;
    Ok(Json(PageResponse::try_from(page)?))
}

pub async fn delete_page_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .landing_page_service
        .delete_page(LandingPageId::parse(&page_id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn publish_page_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> ApiResult<Json<PageResponse>> {
    let page = state
        .landing_page_service
        .publish_page(LandingPageId::parse(&page_id)?)
        .await?;
    Ok(Json(PageResponse::try_from(page)?))
}

pub async fn unpublish_page_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> ApiResult<Json<PageResponse>> {
    let page = state
        .landing_page_service
        .unpublish_page(LandingPageId::parse(&page_id)?)
        .await?;
    Ok(Json(PageResponse::try_from(page)?))
}

pub async fn archive_page_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> ApiResult<Json<PageResponse>> {
    let page = state
        .landing_page_service
        .archive_page(LandingPageId::parse(&page_id)?)
        .await?;
    Ok(Json(PageResponse::try_from(page)?))
}

pub async fn preview_page_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PageResponse>> {
    let page = state.landing_page_service.preview_page(&slug).await?;
    Ok(Json(PageResponse::try_from(page)?))
}
