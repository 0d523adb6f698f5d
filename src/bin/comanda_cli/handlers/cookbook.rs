#![deny(clippy::all, clippy::pedantic)]

use comanda_api_types::UpdateRecipeRequest;
use uuid::Uuid;

use crate::args::CookbookCmd;
use crate::context::{CliError, Ctx};
use crate::print::{print_json, print_view};

pub async fn handle(ctx: &Ctx, cmd: CookbookCmd) -> Result<(), CliError> {
    match cmd {
        CookbookCmd::List => list(ctx).await,
        CookbookCmd::Update {
            id,
            name,
            price,
            active,
        } => update(ctx, id, name, price, active).await,
    }
}

async fn list(ctx: &Ctx) -> Result<(), CliError> {
    let view = ctx.engine.recipes().await;
    print_view(&view)
}

async fn update(
    ctx: &Ctx,
    id: Uuid,
    name: Option<String>,
    price: Option<f64>,
    active: Option<bool>,
) -> Result<(), CliError> {
    let recipe = ctx
        .engine
        .update_recipe(
            id,
            UpdateRecipeRequest {
                name,
                price,
                active,
            },
        )
        .await?;
    print_json(&recipe)
}
