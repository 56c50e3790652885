use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use pagecraft_application::{BlockCategory, BlockMetadata, PageView, RenderOptions};
use pagecraft_core::LandingPageId;
use pagecraft_domain::{BlockConfig, PageTemplate};

use crate::dto::{DocumentEditResponse, EditDocumentRequest, SeedTemplatesResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn editor_view_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> ApiResult<Json<PageView>> {
    let service = &state.landing_page_service;
    let page = service.get_page(LandingPageId::parse(&page_id)?).await?;
    Ok(Json(service.render(&page, RenderOptions::editing())))
}

pub async fn edit_document_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    Json(payload): Json<EditDocumentRequest>,
) -> ApiResult<Json<DocumentEditResponse>> {
    let edit = state
        .landing_page_service
        .edit_document(LandingPageId::parse(&page_id)?, payload.commands)
        .await?;
    Ok(Json(DocumentEditResponse::try_from(edit)?))
}

pub async fn block_catalog_handler(
    State(state): State<AppState>,
) -> Json<BTreeMap<BlockCategory, Vec<BlockMetadata>>> {
    Json(state.landing_page_service.block_catalog())
}

pub async fn default_block_handler(
    State(state): State<AppState>,
    Path(block_type): Path<String>,
) -> ApiResult<Json<BlockConfig>> {
    Ok(Json(
        state.landing_page_service.default_block(&block_type)?,
    ))
}

pub async fn list_templates_handler(State(state): State<AppState>) -> Json<Vec<PageTemplate>> {
    Json(state.landing_page_service.templates())
}

pub async fn seed_templates_handler(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<SeedTemplatesResponse>)> {
    let created = state.landing_page_service.seed_templates().await?;
    Ok((StatusCode::CREATED, Json(SeedTemplatesResponse { created })))
}
