#![deny(clippy::all, clippy::pedantic)]

use comanda::view::{FilterSpec, filter_orders};
use comanda_api_types::SyncOrdersRequest;
use time::Date;

use crate::args::{OrderSortArg, OrderStatusArg, OrdersCmd};
use crate::context::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: OrdersCmd) -> Result<(), CliError> {
    match cmd {
        OrdersCmd::List {
            start,
            end,
            status,
            search,
            sort,
            desc,
        } => list(ctx, start, end, status, search, sort, desc).await,
        OrdersCmd::Sync { start, end } => sync(ctx, start, end).await,
    }
}

async fn list(
    ctx: &Ctx,
    start: Date,
    end: Date,
    status: Option<OrderStatusArg>,
    search: Option<String>,
    sort: Option<OrderSortArg>,
    desc: bool,
) -> Result<(), CliError> {
    let window = Ctx::window(start, end)?;
    let view = ctx.engine.orders(window).await;
    if let Some(error) = view.error {
        return Err(CliError::Backend(error));
    }

    let spec = FilterSpec {
        search,
        order_status: status.map(OrderStatusArg::into_domain),
        sort: sort.map(OrderSortArg::into_key),
        descending: desc,
        ..Default::default()
    };
    let orders = filter_orders(view.data.unwrap_or_default(), &spec);
    print_json(&orders)
}

async fn sync(ctx: &Ctx, start: Option<Date>, end: Option<Date>) -> Result<(), CliError> {
    let response = ctx
        .engine
        .sync_orders(SyncOrdersRequest {
            start_date: start,
            end_date: end,
        })
        .await?;
    print_json(&response)
}
