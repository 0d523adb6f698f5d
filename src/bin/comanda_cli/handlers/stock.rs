#![deny(clippy::all, clippy::pedantic)]

use comanda_api_types::UpdateStockRequest;

use crate::args::StockCmd;
use crate::context::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: StockCmd) -> Result<(), CliError> {
    match cmd {
        StockCmd::Update { sku, qty, reason } => update(ctx, sku, qty, reason).await,
    }
}

async fn update(ctx: &Ctx, sku: String, qty: f64, reason: Option<String>) -> Result<(), CliError> {
    // A confirmed write invalidates the inventory tag before this returns;
    // a validation rejection surfaces here without touching the cache.
    let response = ctx
        .engine
        .update_stock(UpdateStockRequest {
            sku,
            available_qty: qty,
            reason,
        })
        .await?;
    print_json(&response)
}
