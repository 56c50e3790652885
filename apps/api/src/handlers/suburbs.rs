use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use pagecraft_core::SuburbId;

use crate::dto::{CreateSuburbRequest, SuburbResponse, UpdateSuburbRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_active_suburbs_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SuburbResponse>>> {
    let suburbs = state.suburb_service.list_active().await?;
    Ok(Json(suburbs.into_iter().map(SuburbResponse::from).collect()))
}

pub async fn suburb_by_name_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<SuburbResponse>> {
    let suburb = state.suburb_service.get_by_name(&name).await?;
    Ok(Json(SuburbResponse::from(suburb)))
}

pub async fn list_suburbs_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SuburbResponse>>> {
    let suburbs = state.suburb_service.list_all().await?;
    Ok(Json(suburbs.into_iter().map(SuburbResponse::from).collect()))
}

pub async fn create_suburb_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateSuburbRequest>,
) -> ApiResult<(StatusCode, Json<SuburbResponse>)> {
    let suburb = state.suburb_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(SuburbResponse::from(suburb))))
}

pub async fn update_suburb_handler(
    State(state): State<AppState>,
    Path(suburb_id): Path<String>,
    Json(payload): Json<UpdateSuburbRequest>,
) -> ApiResult<Json<SuburbResponse>> {
    let suburb = state
        .suburb_service
        .update(SuburbId::parse(&suburb_id)?, payload.into())
        .await?;
    Ok(Json(SuburbResponse::from(suburb)))
}
