use sea_orm::Database;
use sea_orm_migration::prelude::*;

const USAGE: &str = "Usage: cargo run -p migration -- [up|down|fresh|status]";

enum Command {
    Up,
    Down,
    Fresh,
    Status,
}

impl Command {
    fn parse(raw: Option<String>) -> Option<Self> {
        match raw.as_deref().unwrap_or("up") {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "fresh" => Some(Self::Fresh),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(command) = Command::parse(std::env::args().nth(1)) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let db_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:./halves.db?mode=rwc".to_string());
    let db = Database::connect(&db_url).await?;

    match command {
        Command::Up => migration::Migrator::up(&db, None).await?,
        Command::Down => migration::Migrator::down(&db, None).await?,
        Command::Fresh => migration::Migrator::fresh(&db).await?,
        Command::Status => migration::Migrator::status(&db).await?,
    }

    Ok(())
}
