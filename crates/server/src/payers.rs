use api_types::payers::PayerNames;
use axum::{Json, extract::State};

use crate::server::ServerState;

pub async fn get(State(state): State<ServerState>) -> Json<PayerNames> {
    Json(state.payers.clone())
}
