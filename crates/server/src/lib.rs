use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use serde::Serialize;
pub use ollama::{OllamaConfig, OllamaExtractor};
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod draft;
mod history;
mod ollama;
mod payers;
mod server;
mod session;
mod views;

pub mod types {
    pub use api_types::{
        Payer, Totals,
        draft::{DraftView, ItemUpdate, ItemView, ReceiptImported, ReceiptUpload},
        history::{HistoryQuery, MonthView, SettlementView},
        payers::PayerNames,
        session::{Session, SessionStep, StepUnit},
    };
}

pub enum ServerError {
    Engine(EngineError),
    Payload(JsonRejection),
    Generic(String),
}

/// `Json` extractor whose rejections use the API error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub(crate) struct ApiJson<T>(pub T);

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Extraction(_) => StatusCode::BAD_GATEWAY,
        EngineError::Database(_) | EngineError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidPayer(_)
        | EngineError::InvalidDate(_)
        | EngineError::EmptyDraft(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "history store unavailable, please retry".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Payload(rejection) => (rejection.status(), rejection.body_text()),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Payload(value)
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        for err in [
            EngineError::InvalidAmount("x".to_string()),
            EngineError::InvalidPayer("x".to_string()),
            EngineError::InvalidDate("x".to_string()),
            EngineError::EmptyDraft("x".to_string()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn extraction_maps_to_502() {
        let res = ServerError::from(EngineError::Extraction("down".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn database_maps_to_500() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("locked".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
