use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use crate::dto::{
    BlockTemplateListQuery, BlockTemplateResponse, CreateBlockTemplateRequest,
    SeedTemplatesResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_block_templates_handler(
    State(state): State<AppState>,
    Query(query): Query<BlockTemplateListQuery>,
) -> ApiResult<Json<Vec<BlockTemplateResponse>>> {
    let templates = state
        .block_template_service
        .list(query.category()?)
        .await?
        .into_iter()
        .map(BlockTemplateResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(templates))
}

pub async fn create_block_template_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateBlockTemplateRequest>,
) -> ApiResult<(StatusCode, Json<BlockTemplateResponse>)> {
    let template = state
        .block_template_service
        .create(payload.into_input()?)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(BlockTemplateResponse::try_from(template)?),
    ))
}

pub async fn seed_block_templates_handler(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<SeedTemplatesResponse>)> {
    let created = state.block_template_service.seed_system_templates().await?;
    Ok((StatusCode::CREATED, Json(SeedTemplatesResponse { created })))
}
