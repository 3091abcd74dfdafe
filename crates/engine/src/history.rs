//! Durable storage of settlement records.
//!
//! The engine only talks to the [`HistoryStore`] trait. [`SqliteHistoryStore`]
//! is the production implementation on top of `sea-orm`; tests plug in stores
//! that fail on purpose.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, SettlementRecord, record, record_items};

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persists a record with all of its items, or nothing at all.
    async fn save(&self, record: &SettlementRecord) -> ResultEngine<()>;

    /// Every record, most recent date first, items in their original order.
    async fn fetch_all(&self) -> ResultEngine<Vec<SettlementRecord>>;

    /// Removes a record and its items.
    async fn delete(&self, id: Uuid) -> ResultEngine<()>;
}

#[derive(Clone, Debug)]
pub struct SqliteHistoryStore {
    database: DatabaseConnection,
}

impl SqliteHistoryStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn save(&self, record: &SettlementRecord) -> ResultEngine<()> {
        let settlement_id = record.id.to_string();

        let db_tx = self.database.begin().await?;
        record::ActiveModel::from(record).insert(&db_tx).await?;
        let rows: Vec<record_items::ActiveModel> = record
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| {
                record_items::ActiveModel::from_item(&settlement_id, position, item)
            })
            .collect();
        if !rows.is_empty() {
            record_items::Entity::insert_many(rows).exec(&db_tx).await?;
        }
        db_tx.commit().await?;

        tracing::debug!(
            "stored settlement {settlement_id} with {} items",
            record.items.len()
        );
        Ok(())
    }

    async fn fetch_all(&self) -> ResultEngine<Vec<SettlementRecord>> {
        let settlements = record::Entity::find()
            .order_by_desc(record::Column::Date)
            .all(&self.database)
            .await?;
        let items = record_items::Entity::find()
            .order_by_asc(record_items::Column::SettlementId)
            .order_by_asc(record_items::Column::Position)
            .all(&self.database)
            .await?;

        let mut by_settlement: HashMap<String, Vec<record_items::Model>> = HashMap::new();
        for item in items {
            by_settlement
                .entry(item.settlement_id.clone())
                .or_default()
                .push(item);
        }

        settlements
            .into_iter()
            .map(|model| {
                let items = by_settlement.remove(&model.id).unwrap_or_default();
                SettlementRecord::from_rows(model, items)
            })
            .collect()
    }

    async fn delete(&self, id: Uuid) -> ResultEngine<()> {
        let settlement_id = id.to_string();

        let db_tx = self.database.begin().await?;
        record_items::Entity::delete_many()
            .filter(record_items::Column::SettlementId.eq(settlement_id.as_str()))
            .exec(&db_tx)
            .await?;
        let deleted = record::Entity::delete_by_id(settlement_id.clone())
            .exec(&db_tx)
            .await?;
        if deleted.rows_affected == 0 {
            // Dropping the transaction rolls back the item deletion.
            return Err(EngineError::KeyNotFound(settlement_id));
        }
        db_tx.commit().await?;
        Ok(())
    }
}
