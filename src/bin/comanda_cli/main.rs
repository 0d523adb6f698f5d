//! comanda-cli: restaurant operations command-line client
//! Thin shell over the `comanda` library; all caching and fetch behavior
//! lives there.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod context;
mod handlers;
mod print;

use clap::Parser;

use args::{Cli, Commands};
use context::{CliError, Ctx};
use handlers::{cookbook, inventory, orders, overview, prefs, restock, sales, stock};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = Ctx::build(&cli.overrides()).await?;

    let _ = comanda::infra::telemetry::init(&ctx.settings.logging);

    match cli.command {
        Commands::Inventory(cmd) => inventory::handle(&ctx, cmd.action).await?,
        Commands::Restock(cmd) => restock::handle(&ctx, cmd.action).await?,
        Commands::Orders(cmd) => orders::handle(&ctx, cmd.action).await?,
        Commands::Sales(cmd) => sales::handle(&ctx, cmd.action).await?,
        Commands::Cookbook(cmd) => cookbook::handle(&ctx, cmd.action).await?,
        Commands::Stock(cmd) => stock::handle(&ctx, cmd.action).await?,
        Commands::Overview => overview::handle(&ctx).await?,
        Commands::Prefs(cmd) => prefs::handle(&ctx, cmd.action).await?,
    }

    Ok(())
}
