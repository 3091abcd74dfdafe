use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{
    HistoryStore, Money, SettlementDate, SettlementRecord, SqliteHistoryStore, Totals, aggregate,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "halves_admin")]
#[command(about = "Admin utilities for Halves (inspect and prune settlement history)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./halves.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List settlements, most recent first.
    History(HistoryArgs),
    /// Show the items of one settlement.
    Show(IdArgs),
    /// Delete a settlement and its items.
    Delete(IdArgs),
}

#[derive(Args, Debug)]
struct HistoryArgs {
    /// Only records of this month (`YYYY-MM`), with the month totals.
    #[arg(long)]
    month: Option<String>,
}

#[derive(Args, Debug)]
struct IdArgs {
    id: Uuid,
}

fn money(minor: i64) -> String {
    Money::new(minor)
        .map(|money| money.to_string())
        .unwrap_or_else(|_| minor.to_string())
}

fn print_totals(label: &str, totals: &Totals) {
    println!(
        "{label:<12} A {:>10}  B {:>10}  total {:>10}",
        money(totals.payer_a),
        money(totals.payer_b),
        money(totals.grand)
    );
}

fn print_record(record: &SettlementRecord) {
    println!(
        "{}  {}  {:>3} items  A {:>10}  B {:>10}  total {:>10}",
        record.id,
        record.date,
        record.item_count,
        money(record.totals.payer_a),
        money(record.totals.payer_b),
        money(record.totals.grand)
    );
}

fn find_record(
    records: &[SettlementRecord],
    id: Uuid,
) -> Result<&SettlementRecord, Box<dyn Error + Send + Sync>> {
    records
        .iter()
        .find(|record| record.id == id)
        .ok_or_else(|| format!("settlement not found: {id}").into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let store = SqliteHistoryStore::new(db);

    match cli.command {
        Command::History(HistoryArgs { month: None }) => {
            let records = store.fetch_all().await?;
            if records.is_empty() {
                println!("no settlements");
            }
            for record in &records {
                print_record(record);
            }
        }
        Command::History(HistoryArgs { month: Some(month) }) => {
            let reference = SettlementDate::first_of_month(&month)?;
            let records = store.fetch_all().await?;
            for record in aggregate::records_in_month(&records, &reference) {
                print_record(record);
            }
            print_totals(
                reference.month_prefix(),
                &aggregate::month_totals(&records, &reference),
            );
        }
        Command::Show(IdArgs { id }) => {
            let records = store.fetch_all().await?;
            let record = find_record(&records, id)?;

            print_record(record);
            for item in &record.items {
                println!(
                    "  {:<32} {:>10}  {}",
                    item.name,
                    money(item.amount_minor),
                    item.payer
                );
            }
        }
        Command::Delete(IdArgs { id }) => {
            store.delete(id).await?;
            println!("deleted settlement: {id}");
        }
    }

    Ok(())
}
