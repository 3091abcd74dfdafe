use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tokio::sync::Mutex;

use std::sync::Arc;

use crate::{draft, history, payers, session, types::PayerNames};
use engine::{Engine, ReceiptExtractor};

/// Shared state of the HTTP API.
///
/// The engine sits behind one mutex: every request is one state mutation,
/// applied in arrival order.
#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Mutex<Engine>>,
    pub extractor: Arc<dyn ReceiptExtractor>,
    pub payers: PayerNames,
}

impl ServerState {
    pub fn new(engine: Engine, extractor: Arc<dyn ReceiptExtractor>, payers: PayerNames) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            extractor,
            payers,
        }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/session", get(session::get).put(session::select))
        .route("/session/step", post(session::step))
        .route("/draft", get(draft::get).delete(draft::clear))
        .route("/draft/receipt", post(draft::upload_receipt))
        .route(
            "/draft/items/{id}",
            patch(draft::update_item).delete(draft::remove_item),
        )
        .route("/draft/settle", post(draft::settle))
        .route("/history", get(history::month))
        .route("/history/{id}", delete(history::delete_record))
        .route("/payers", get(payers::get))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
