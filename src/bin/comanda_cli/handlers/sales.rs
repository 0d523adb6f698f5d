#![deny(clippy::all, clippy::pedantic)]

use time::Date;

use crate::args::SalesCmd;
use crate::context::{CliError, Ctx};
use crate::print::print_view;

pub async fn handle(ctx: &Ctx, cmd: SalesCmd) -> Result<(), CliError> {
    match cmd {
        SalesCmd::Day { date } => day(ctx, date).await,
        SalesCmd::Totals { start, end } => totals(ctx, start, end).await,
    }
}

async fn day(ctx: &Ctx, date: Date) -> Result<(), CliError> {
    let view = ctx.engine.sales_day(date).await;
    print_view(&view)
}

async fn totals(ctx: &Ctx, start: Date, end: Date) -> Result<(), CliError> {
    let window = Ctx::window(start, end)?;
    let view = ctx.engine.sales_totals(window).await;
    print_view(&view)
}
