#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use comanda::view::{export_inventory_csv, filter_inventory};
use time::OffsetDateTime;

use crate::args::{InventoryCmd, InventoryFilterArgs};
use crate::context::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: InventoryCmd) -> Result<(), CliError> {
    match cmd {
        InventoryCmd::List { filters } => list(ctx, &filters).await,
        InventoryCmd::Export { filters, out } => export(ctx, &filters, out).await,
    }
}

async fn list(ctx: &Ctx, filters: &InventoryFilterArgs) -> Result<(), CliError> {
    let view = ctx.engine.inventory().await;
    if let Some(error) = view.error {
        return Err(CliError::Backend(error));
    }

    let items = filter_inventory(
        view.data.unwrap_or_default(),
        &filters.to_spec(),
        OffsetDateTime::now_utc(),
    );
    print_json(&items)
}

async fn export(
    ctx: &Ctx,
    filters: &InventoryFilterArgs,
    out: Option<PathBuf>,
) -> Result<(), CliError> {
    let view = ctx.engine.inventory().await;
    if let Some(error) = view.error {
        return Err(CliError::Backend(error));
    }

    let items = filter_inventory(
        view.data.unwrap_or_default(),
        &filters.to_spec(),
        OffsetDateTime::now_utc(),
    );
    let csv = export_inventory_csv(&items)?;

    match out {
        Some(path) => {
            tokio::fs::write(&path, csv).await?;
            eprintln!("exported {} rows to {}", items.len(), path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}
