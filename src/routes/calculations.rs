use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::Value;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{
    CalculationOutcome, HistoryPage, HistoryQuery, RestoredCalculation, SuccessResponse,
};
use crate::services::calculation_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calculate", post(calculate))
        .route("/history", get(fetch_history).delete(delete_all_records))
        .route("/history/:id", delete(delete_record))
        .route("/history/restore", post(restore_record))
}

#[axum::debug_handler]
pub async fn calculate(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<CalculationOutcome>, AppError> {
    info!("POST /calculate - Computing T+0 adjustment");
    let outcome = calculation_service::create(&state.pool, state.fees, body)
        .await
        .map_err(|e| {
            error!("Failed to process calculation: {}", e);
            e
        })?;
    Ok(Json(outcome))
}

pub async fn fetch_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryPage>, AppError> {
    info!(
        "GET /history - page={:?}, limit={:?}",
        params.page, params.limit
    );
    let page = calculation_service::history_page(&state.pool, params.page, params.limit)
        .await
        .map_err(|e| {
            error!("Failed to fetch history: {}", e);
            e
        })?;
    Ok(Json(page))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    info!("DELETE /history/{} - Deleting record", id);
    calculation_service::delete_one(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to delete record {}: {}", id, e);
            e
        })?;
    Ok(Json(SuccessResponse::ok()))
}

pub async fn delete_all_records(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse>, AppError> {
    info!("DELETE /history - Deleting all records");
    calculation_service::delete_all(&state.pool)
        .await
        .map_err(|e| {
            error!("Failed to delete all records: {}", e);
            e
        })?;
    Ok(Json(SuccessResponse::ok()))
}

pub async fn restore_record(
    State(state): State<AppState>,
    Json(record): Json<RestoredCalculation>,
) -> Result<Json<SuccessResponse>, AppError> {
    info!(
        "POST /history/restore - Restoring record for {}",
        record.stock_code
    );
    calculation_service::restore(&state.pool, record)
        .await
        .map_err(|e| {
            error!("Failed to restore record: {}", e);
            e
        })?;
    Ok(Json(SuccessResponse::ok()))
}
