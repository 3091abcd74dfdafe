//! Draft API endpoints: the items of the active date, their totals and
//! settlement.

use api_types::{
    draft::{DraftView, ItemUpdate, ItemView, ReceiptImported, ReceiptUpload},
    history::SettlementView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::ItemPatch;
use uuid::Uuid;

use crate::{
    ApiJson, ServerError,
    server::ServerState,
    views::{engine_payer, item_view, map_totals, settlement_view},
};

pub async fn get(State(state): State<ServerState>) -> Json<DraftView> {
    let engine = state.engine.lock().await;
    let date = engine.active_date();

    Json(DraftView {
        date: date.to_string(),
        items: engine.active_items().iter().map(item_view).collect(),
        totals: map_totals(engine.day_totals()),
        settled: engine.is_settled(date),
    })
}

/// Handle receipt uploads: extracted items are appended to the active draft
pub async fn upload_receipt(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<ReceiptUpload>,
) -> Result<Json<ReceiptImported>, ServerError> {
    if payload.image_base64.trim().is_empty() {
        return Err(ServerError::Generic("image_base64 is required".to_string()));
    }

    let mut engine = state.engine.lock().await;
    let items = engine
        .analyze_receipt(state.extractor.as_ref(), &payload.image_base64)
        .await?;

    Ok(Json(ReceiptImported {
        items: items.iter().map(item_view).collect(),
    }))
}

pub async fn update_item(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<ItemUpdate>,
) -> Result<Json<ItemView>, ServerError> {
    let patch = ItemPatch {
        name: payload.name.map(|name| name.trim().to_string()),
        amount_minor: payload.amount_minor,
        payer: payload.payer.map(engine_payer),
    };

    let mut engine = state.engine.lock().await;
    let item = engine.update_item(id, &patch)?;
    Ok(Json(item_view(&item)))
}

pub async fn remove_item(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.lock().await.remove_item(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear(State(state): State<ServerState>) -> StatusCode {
    let removed = state.engine.lock().await.clear_draft();
    tracing::debug!("cleared {removed} draft items");
    StatusCode::NO_CONTENT
}

/// Handle settlement of the active draft
pub async fn settle(
    State(state): State<ServerState>,
) -> Result<(StatusCode, Json<SettlementView>), ServerError> {
    let record = state.engine.lock().await.settle().await?;
    Ok((StatusCode::CREATED, Json(settlement_view(&record))))
}
