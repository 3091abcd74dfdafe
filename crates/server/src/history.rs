//! History API endpoints

use api_types::history::{HistoryQuery, MonthView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::SettlementDate;
use uuid::Uuid;

use crate::{
    ServerError,
    server::ServerState,
    views::{map_totals, settlement_view},
};

/// Handle requests for the monthly review
pub async fn month(
    State(state): State<ServerState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<MonthView>, ServerError> {
    let reference = query
        .date
        .as_deref()
        .map(SettlementDate::parse)
        .transpose()?;

    let engine = state.engine.lock().await;
    let reference = reference.unwrap_or_else(|| engine.active_date().clone());

    Ok(Json(MonthView {
        month: reference.month_prefix().to_string(),
        records: engine
            .month_records(Some(&reference))
            .into_iter()
            .map(settlement_view)
            .collect(),
        totals: map_totals(engine.month_totals(Some(&reference))),
    }))
}

pub async fn delete_record(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.lock().await.delete_record(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
