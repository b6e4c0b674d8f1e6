//! Order API endpoints.

use api_types::order::{GradesResponse, OrderSyncResponse};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

/// Pulls the latest buy/sell transactions from the stock API into the store.
pub async fn sync(State(state): State<ServerState>) -> Result<Json<OrderSyncResponse>, ServerError> {
    let report = state.engine.sync_transactions().await?;

    Ok(Json(OrderSyncResponse {
        message: format!(
            "Sync completed successfully. Buy transactions: {}, Sell transactions: {}",
            report.buy, report.sell
        ),
    }))
}

pub async fn grades(State(state): State<ServerState>) -> Result<Json<GradesResponse>, ServerError> {
    let grades = state.engine.distinct_grades().await?;

    Ok(Json(GradesResponse { grades }))
}
