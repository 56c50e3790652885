use axum::Json;
use axum::extract::{Path, Query, State};
use pagecraft_core::LeadId;
use pagecraft_domain::LeadStatus;

use crate::dto::{LeadListQueryRequest, LeadResponse, UpdateLeadStatusRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_leads_handler(
    State(state): State<AppState>,
    Query(query): Query<LeadListQueryRequest>,
) -> ApiResult<Json<Vec<LeadResponse>>> {
    let leads = state
        .lead_service
        .list_leads(query.into_query()?)
        .await?
        .into_iter()
        .map(LeadResponse::from)
        .collect();

    Ok(Json(leads))
}

pub async fn get_lead_handler(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
) -> ApiResult<Json<LeadResponse>> {
    let lead = state.lead_service.get_lead(LeadId::parse(&lead_id)?).await?;
    Ok(Json(LeadResponse::from(lead)))
}

pub async fn update_lead_status_handler(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
    Json(payload): Json<UpdateLeadStatusRequest>,
) -> ApiResult<Json<LeadResponse>> {
    let status = payload.status.parse::<LeadStatus>()?;
    let lead = state
        .lead_service
        .update_lead_status(LeadId::parse(&lead_id)?, status, payload.notes)
        .await?;
    Ok(Json(LeadResponse::from(lead)))
}
