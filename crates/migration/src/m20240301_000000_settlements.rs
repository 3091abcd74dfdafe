//! Initial schema.
//!
//! - `settlements`: one row per settled day, with the totals computed at
//!   settlement time
//! - `settlement_items`: the item snapshot of each settlement, in draft order

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Settlements {
    Table,
    Id,
    Date,
    PayerATotal,
    PayerBTotal,
    GrandTotal,
}

#[derive(Iden)]
enum SettlementItems {
    Table,
    Id,
    SettlementId,
    Position,
    Name,
    AmountMinor,
    Payer,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Settlements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Settlements::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Settlements::Date).string().not_null())
                    .col(
                        ColumnDef::new(Settlements::PayerATotal)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Settlements::PayerBTotal)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Settlements::GrandTotal)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_settlements_date")
                    .table(Settlements::Table)
                    .col(Settlements::Date)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SettlementItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SettlementItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SettlementItems::SettlementId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SettlementItems::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SettlementItems::Name).string().not_null())
                    .col(
                        ColumnDef::new(SettlementItems::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SettlementItems::Payer).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_settlement_items_settlement")
                            .from(SettlementItems::Table, SettlementItems::SettlementId)
                            .to(Settlements::Table, Settlements::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_settlement_items_settlement")
                    .table(SettlementItems::Table)
                    .col(SettlementItems::SettlementId)
                    .col(SettlementItems::Position)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SettlementItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Settlements::Table).to_owned())
            .await
    }
}
