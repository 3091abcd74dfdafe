//! Active date endpoints

use api_types::session::{Session, SessionStep, StepUnit};
use axum::{Json, extract::State};
use engine::SettlementDate;

use crate::{ApiJson, ServerError, server::ServerState};

pub async fn get(State(state): State<ServerState>) -> Json<Session> {
    let engine = state.engine.lock().await;
    Json(Session {
        date: engine.active_date().to_string(),
    })
}

/// Handle requests for picking the active date
pub async fn select(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<Session>,
) -> Result<Json<Session>, ServerError> {
    let date = SettlementDate::parse(&payload.date)?;
    let mut engine = state.engine.lock().await;
    engine.select_date(date);

    Ok(Json(Session {
        date: engine.active_date().to_string(),
    }))
}

/// Handle requests for moving the active date by days or months
pub async fn step(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<SessionStep>,
) -> Result<Json<Session>, ServerError> {
    let mut engine = state.engine.lock().await;
    let date = match payload.unit {
        StepUnit::Day => engine.step_days(i64::from(payload.delta))?,
        StepUnit::Month => engine.step_months(payload.delta)?,
    };

    Ok(Json(Session {
        date: date.to_string(),
    }))
}
