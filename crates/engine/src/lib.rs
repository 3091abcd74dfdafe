use std::{path::PathBuf, sync::Arc};

use sea_orm::DatabaseConnection;
use uuid::Uuid;

pub use cache::{CachedState, DRAFTS_KEY, HISTORY_KEY, LocalCache};
pub use date::SettlementDate;
pub use draft::DraftStore;
pub use error::EngineError;
pub use extract::{ReceiptExtractor, strip_data_url};
pub use history::{HistoryStore, SqliteHistoryStore};
pub use items::{ExtractedItem, ItemPatch, LineItem};
pub use money::{MAX_AMOUNT_MINOR, Money};
pub use payer::Payer;
pub use record::SettlementRecord;
pub use split::{Totals, calculate, halves};

pub mod aggregate;
mod cache;
mod date;
mod draft;
mod error;
mod extract;
mod history;
mod items;
mod money;
mod payer;
mod record;
mod record_items;
pub mod split;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

/// Application state: drafts, the active date and the history cache.
///
/// Every mutation goes through a method of this struct and ends with a write
/// of the local cache. Settlement and deletion only touch in-memory state
/// after the history store has accepted the change.
pub struct Engine {
    drafts: DraftStore,
    history: Vec<SettlementRecord>,
    active_date: SettlementDate,
    store: Arc<dyn HistoryStore>,
    cache: Option<LocalCache>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("drafts", &self.drafts)
            .field("history", &self.history.len())
            .field("active_date", &self.active_date)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn active_date(&self) -> &SettlementDate {
        &self.active_date
    }

    /// Makes `date` the active day. Its draft, if any, becomes the active one.
    pub fn select_date(&mut self, date: SettlementDate) {
        tracing::debug!("active date {} -> {}", self.active_date, date);
        self.active_date = date;
    }

    /// Selects the first day of `month` (`YYYY-MM`).
    pub fn select_month(&mut self, month: &str) -> ResultEngine<&SettlementDate> {
        let date = SettlementDate::first_of_month(month)?;
        self.select_date(date);
        Ok(&self.active_date)
    }

    pub fn step_days(&mut self, delta: i64) -> ResultEngine<&SettlementDate> {
        let date = self.active_date.add_days(delta)?;
        self.select_date(date);
        Ok(&self.active_date)
    }

    pub fn step_months(&mut self, delta: i32) -> ResultEngine<&SettlementDate> {
        let date = self.active_date.add_months(delta)?;
        self.select_date(date);
        Ok(&self.active_date)
    }

    /// Items of the active draft.
    pub fn active_items(&self) -> &[LineItem] {
        self.drafts.items(&self.active_date)
    }

    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    /// Totals of the active draft (day mode).
    pub fn day_totals(&self) -> Totals {
        aggregate::day_totals(self.active_items())
    }

    /// Cached history, most recent first.
    pub fn history(&self) -> &[SettlementRecord] {
        &self.history
    }

    /// Records in the month of `reference` (the active date when `None`).
    pub fn month_records(&self, reference: Option<&SettlementDate>) -> Vec<&SettlementRecord> {
        let reference = reference.unwrap_or(&self.active_date);
        aggregate::records_in_month(&self.history, reference).collect()
    }

    /// Totals of the month of `reference` (month mode).
    pub fn month_totals(&self, reference: Option<&SettlementDate>) -> Totals {
        let reference = reference.unwrap_or(&self.active_date);
        aggregate::month_totals(&self.history, reference)
    }

    /// `true` when a record already exists for `date`. Clients use it to
    /// show the day as read-only; the engine itself does not refuse edits.
    pub fn is_settled(&self, date: &SettlementDate) -> bool {
        self.history.iter().any(|record| &record.date == date)
    }

    /// Appends extracted candidates to the draft of `date`.
    ///
    /// Every item gets a fresh id and `PayerA`. Candidates with an unusable
    /// amount are skipped and logged.
    pub fn import_extracted(
        &mut self,
        date: &SettlementDate,
        extracted: Vec<ExtractedItem>,
    ) -> Vec<LineItem> {
        let mut added = Vec::with_capacity(extracted.len());
        for candidate in extracted {
            match candidate.into_line_item() {
                Ok(item) => added.push(item),
                Err(err) => tracing::warn!("skipping extracted item: {err}"),
            }
        }

        self.drafts.append(date, added.clone());
        self.persist();
        tracing::info!("added {} items to draft {date}", added.len());
        added
    }

    /// Runs the extractor on `image_base64` and appends the result to the
    /// active draft. On failure the draft is left as it was.
    pub async fn analyze_receipt(
        &mut self,
        extractor: &dyn ReceiptExtractor,
        image_base64: &str,
    ) -> ResultEngine<Vec<LineItem>> {
        let date = self.active_date.clone();
        let extracted = extractor.extract(image_base64).await.map_err(|err| {
            tracing::error!("receipt extraction failed: {err}");
            err
        })?;
        Ok(self.import_extracted(&date, extracted))
    }

    pub fn update_item(&mut self, item_id: Uuid, patch: &ItemPatch) -> ResultEngine<LineItem> {
        let date = self.active_date.clone();
        let item = self.drafts.update_item(&date, item_id, patch)?.clone();
        self.persist();
        Ok(item)
    }

    pub fn remove_item(&mut self, item_id: Uuid) -> ResultEngine<LineItem> {
        let date = self.active_date.clone();
        let item = self.drafts.remove_item(&date, item_id)?;
        self.persist();
        Ok(item)
    }

    /// Empties the active draft, returning how many items were dropped.
    pub fn clear_draft(&mut self) -> usize {
        let date = self.active_date.clone();
        let removed = self.drafts.clear(&date).len();
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Settles the active draft.
    ///
    /// The record is stored first; only then is it put at the front of the
    /// history cache and the draft cleared. If the store fails, nothing
    /// changes locally and the error is returned so the user can retry.
    pub async fn settle(&mut self) -> ResultEngine<SettlementRecord> {
        let date = self.active_date.clone();
        let items = self.drafts.items(&date);
        let totals = aggregate::day_totals(items);
        let record = SettlementRecord::new(date.clone(), items, totals)?;

        if let Err(err) = self.store.save(&record).await {
            tracing::error!("failed to save settlement for {date}: {err}");
            return Err(err);
        }

        self.history.insert(0, record.clone());
        self.drafts.clear(&date);
        self.persist();
        tracing::info!(
            "settled {date}: {} items, total {}",
            record.item_count,
            record.totals.grand
        );
        Ok(record)
    }

    /// Deletes a record from the store, then from the cache.
    pub async fn delete_record(&mut self, id: Uuid) -> ResultEngine<()> {
        if let Err(err) = self.store.delete(id).await {
            tracing::error!("failed to delete settlement {id}: {err}");
            return Err(err);
        }

        self.history.retain(|record| record.id != id);
        self.persist();
        tracing::info!("deleted settlement {id}");
        Ok(())
    }

    /// Replaces the history cache with the store content.
    ///
    /// On failure the cache is kept as is.
    pub async fn refresh_history(&mut self) -> ResultEngine<usize> {
        let records = self.store.fetch_all().await?;
        let count = records.len();
        self.history = records;
        self.persist();
        Ok(count)
    }

    fn persist(&self) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Err(err) = cache.save(&self.drafts, &self.history) {
            tracing::warn!(
                "failed to write local cache {}: {err}",
                cache.path().display()
            );
        }
    }
}

#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn HistoryStore>>,
    cache_path: Option<PathBuf>,
    active_date: Option<SettlementDate>,
}

impl EngineBuilder {
    /// Use a SQLite database (through sea-orm) as history store.
    pub fn database(self, db: DatabaseConnection) -> EngineBuilder {
        self.history_store(Arc::new(SqliteHistoryStore::new(db)))
    }

    pub fn history_store(mut self, store: Arc<dyn HistoryStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Mirror drafts and history to a JSON file at `path`.
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> EngineBuilder {
        self.cache_path = Some(path.into());
        self
    }

    /// Initial active date (today when not set).
    pub fn active_date(mut self, date: SettlementDate) -> EngineBuilder {
        self.active_date = Some(date);
        self
    }

    /// Builds the engine: loads the local cache, then syncs the history with
    /// the store. A failed sync is logged and the cached history is used.
    pub async fn build(self) -> ResultEngine<Engine> {
        let store = self
            .store
            .ok_or_else(|| EngineError::KeyNotFound("history store".to_string()))?;
        let cache = self.cache_path.map(LocalCache::new);

        let cached = match &cache {
            Some(cache) => cache.load().unwrap_or_else(|err| {
                tracing::warn!(
                    "ignoring local cache {}: {err}",
                    cache.path().display()
                );
                CachedState::default()
            }),
            None => CachedState::default(),
        };

        let mut engine = Engine {
            drafts: cached.drafts,
            history: cached.history,
            active_date: self.active_date.unwrap_or_else(SettlementDate::today),
            store,
            cache,
        };

        match engine.refresh_history().await {
            Ok(count) => tracing::info!("loaded {count} settlements from history store"),
            Err(err) => tracing::warn!(
                "failed to sync history, using {} cached records: {err}",
                engine.history.len()
            ),
        }

        Ok(engine)
    }
}
