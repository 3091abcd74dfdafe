//! Item rows of a settlement record.
//!
//! `position` keeps the order the items had in the draft.

use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, LineItem, Payer};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "settlement_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub settlement_id: String,
    pub position: i32,
    pub name: String,
    pub amount_minor: i64,
    pub payer: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::record::Entity",
        from = "Column::SettlementId",
        to = "super::record::Column::Id"
    )]
    Settlement,
}

impl Related<super::record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Settlement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_item(settlement_id: &str, position: usize, item: &LineItem) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            settlement_id: ActiveValue::Set(settlement_id.to_string()),
            position: ActiveValue::Set(position as i32),
            name: ActiveValue::Set(item.name.clone()),
            amount_minor: ActiveValue::Set(item.amount_minor),
            payer: ActiveValue::Set(item.payer.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for LineItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        crate::items::validate_amount(model.amount_minor).map_err(|err| {
            EngineError::InvalidAmount(format!("stored item {}: {err}", model.id))
        })?;
        Ok(Self {
            id: crate::util::parse_uuid(&model.id, "settlement item")?,
            name: model.name,
            amount_minor: model.amount_minor,
            payer: Payer::try_from(model.payer.as_str())?,
        })
    }
}
