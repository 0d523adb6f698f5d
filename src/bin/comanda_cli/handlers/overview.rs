#![deny(clippy::all, clippy::pedantic)]

//! Morning overview: one combined loading/error state over several
//! resources, the way a dashboard landing screen consumes the engine.

use comanda::domain::stock::stock_level;
use comanda::domain::types::StockLevel;
use comanda::sync::CombinedView;
use time::OffsetDateTime;

use crate::context::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx) -> Result<(), CliError> {
    let today = OffsetDateTime::now_utc().date();

    let (inventory, restock, sales) = tokio::join!(
        ctx.engine.inventory(),
        ctx.engine.restock(),
        ctx.engine.sales_day(today),
    );

    let combined = CombinedView::of(&[&inventory, &restock, &sales]);
    if let Some(error) = combined.error {
        return Err(CliError::Backend(error));
    }

    let items = inventory.data.unwrap_or_default();
    let critical = items
        .iter()
        .filter(|item| stock_level(item) == StockLevel::Critical)
        .count();
    let low = items
        .iter()
        .filter(|item| stock_level(item) == StockLevel::Low)
        .count();

    let body = serde_json::json!({
        "loading": combined.loading,
        "inventory": {
            "total_items": items.len(),
            "critical": critical,
            "low": low,
        },
        "restock_open": restock.data.map_or(0, |r| r.len()),
        "sales_today": sales.data,
    });
    print_json(&body)
}
