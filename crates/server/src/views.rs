//! Mapping between engine types and API types.

use api_types::{Payer as ApiPayer, Totals as ApiTotals, draft::ItemView, history::SettlementView};

pub(crate) fn map_payer(payer: engine::Payer) -> ApiPayer {
    match payer {
        engine::Payer::PayerA => ApiPayer::PayerA,
        engine::Payer::PayerB => ApiPayer::PayerB,
        engine::Payer::Split => ApiPayer::Split,
    }
}

pub(crate) fn engine_payer(payer: ApiPayer) -> engine::Payer {
    match payer {
        ApiPayer::PayerA => engine::Payer::PayerA,
        ApiPayer::PayerB => engine::Payer::PayerB,
        ApiPayer::Split => engine::Payer::Split,
    }
}

pub(crate) fn map_totals(totals: engine::Totals) -> ApiTotals {
    ApiTotals {
        payer_a: totals.payer_a,
        payer_b: totals.payer_b,
        grand: totals.grand,
    }
}

pub(crate) fn item_view(item: &engine::LineItem) -> ItemView {
    ItemView {
        id: item.id,
        name: item.name.clone(),
        amount_minor: item.amount_minor,
        payer: map_payer(item.payer),
        split: item.split_preview(),
    }
}

pub(crate) fn settlement_view(record: &engine::SettlementRecord) -> SettlementView {
    SettlementView {
        id: record.id,
        date: record.date.to_string(),
        totals: map_totals(record.totals),
        item_count: record.item_count,
        items: record.items.iter().map(item_view).collect(),
    }
}
