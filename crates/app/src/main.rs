use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use server::{OllamaExtractor, ServerState, types::PayerNames};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "halves={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    if settings.extractor.api_key.is_none() {
        tracing::warn!("no extractor api key configured, receipt analysis may be refused");
    }
    tracing::info!(
        "receipt extractor: {} ({})",
        settings.extractor.base_url,
        settings.extractor.model
    );

    let db = parse_database(&settings.server.database).await?;
    let engine = engine::Engine::builder()
        .database(db)
        .cache_path(&settings.app.cache_path)
        .build()
        .await?;

    let extractor = OllamaExtractor::new(reqwest::Client::new(), settings.extractor);
    let state = ServerState::new(
        engine,
        Arc::new(extractor),
        PayerNames {
            payer_a: settings.app.payer_a,
            payer_b: settings.app.payer_b,
        },
    );

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(state, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
