//! Unsettled items, grouped by day.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ItemPatch, LineItem, ResultEngine, SettlementDate};

/// Map from calendar date to the ordered items waiting to be settled.
///
/// Days without items are not kept around: emptying a draft removes its key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftStore {
    drafts: BTreeMap<SettlementDate, Vec<LineItem>>,
}

impl DraftStore {
    #[must_use]
    pub fn items(&self, date: &SettlementDate) -> &[LineItem] {
        self.drafts.get(date).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn dates(&self) -> impl Iterator<Item = &SettlementDate> {
        self.drafts.keys()
    }

    pub fn append(&mut self, date: &SettlementDate, items: Vec<LineItem>) {
        if items.is_empty() {
            return;
        }
        self.drafts.entry(date.clone()).or_default().extend(items);
    }

    pub fn update_item(
        &mut self,
        date: &SettlementDate,
        item_id: Uuid,
        patch: &ItemPatch,
    ) -> ResultEngine<&LineItem> {
        let item = self
            .drafts
            .get_mut(date)
            .and_then(|items| items.iter_mut().find(|item| item.id == item_id))
            .ok_or_else(|| EngineError::KeyNotFound(item_id.to_string()))?;
        item.apply(patch)?;
        Ok(item)
    }

    pub fn remove_item(&mut self, date: &SettlementDate, item_id: Uuid) -> ResultEngine<LineItem> {
        let items = self
            .drafts
            .get_mut(date)
            .ok_or_else(|| EngineError::KeyNotFound(item_id.to_string()))?;
        let idx = items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| EngineError::KeyNotFound(item_id.to_string()))?;
        let removed = items.remove(idx);
        if items.is_empty() {
            self.drafts.remove(date);
        }
        Ok(removed)
    }

    /// Drops the draft of `date`, returning its items.
    pub fn clear(&mut self, date: &SettlementDate) -> Vec<LineItem> {
        self.drafts.remove(date).unwrap_or_default()
    }
}
