#![deny(clippy::all, clippy::pedantic)]

use crate::args::PrefsCmd;
use crate::context::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PrefsCmd) -> Result<(), CliError> {
    match cmd {
        PrefsCmd::Show => {
            let prefs = ctx.prefs.get().await;
            print_json(&prefs)
        }
        PrefsCmd::GuidedTour { enabled } => {
            ctx.prefs.set_guided_tour(enabled).await?;
            print_json(&ctx.prefs.get().await)
        }
    }
}
