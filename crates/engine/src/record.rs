//! Settlement records.
//!
//! A `SettlementRecord` is the immutable outcome of settling a draft: the
//! date, the totals computed at that moment and an owned snapshot of the
//! items. Its rows live in `settlements` and `settlement_items`.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, LineItem, ResultEngine, SettlementDate, Totals, record_items};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub id: Uuid,
    pub date: SettlementDate,
    pub totals: Totals,
    pub item_count: usize,
    pub items: Vec<LineItem>,
}

impl SettlementRecord {
    /// Builds a record from the items of a draft and their totals.
    ///
    /// The items are cloned: later edits of the draft never reach the record.
    pub fn new(date: SettlementDate, items: &[LineItem], totals: Totals) -> ResultEngine<Self> {
        if items.is_empty() {
            return Err(EngineError::EmptyDraft(date.to_string()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            date,
            totals,
            item_count: items.len(),
            items: items.to_vec(),
        })
    }

    /// Rebuilds a record from its stored rows. `items` must already be in
    /// their original order.
    pub(crate) fn from_rows(model: Model, items: Vec<record_items::Model>) -> ResultEngine<Self> {
        let items = items
            .into_iter()
            .map(LineItem::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        for total in [model.payer_a_total, model.payer_b_total, model.grand_total] {
            crate::items::validate_amount(total)?;
        }
        Ok(Self {
            id: crate::util::parse_uuid(&model.id, "settlement")?,
            date: SettlementDate::parse(&model.date)?,
            totals: Totals {
                payer_a: model.payer_a_total,
                payer_b: model.payer_b_total,
                grand: model.grand_total,
            },
            item_count: items.len(),
            items,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "settlements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub date: String,
    pub payer_a_total: i64,
    pub payer_b_total: i64,
    pub grand_total: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::record_items::Entity")]
    Items,
}

impl Related<super::record_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SettlementRecord> for ActiveModel {
    fn from(record: &SettlementRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.to_string()),
            date: ActiveValue::Set(record.date.to_string()),
            payer_a_total: ActiveValue::Set(record.totals.payer_a),
            payer_b_total: ActiveValue::Set(record.totals.payer_b),
            grand_total: ActiveValue::Set(record.totals.grand),
        }
    }
}
