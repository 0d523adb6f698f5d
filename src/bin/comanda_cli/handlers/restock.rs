#![deny(clippy::all, clippy::pedantic)]

use comanda::view::{FilterSpec, filter_restock};

use crate::args::{PriorityArg, RestockCmd, RestockSortArg, RestockStatusArg};
use crate::context::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: RestockCmd) -> Result<(), CliError> {
    match cmd {
        RestockCmd::List {
            search,
            min_priority,
            status,
            sort,
            desc,
        } => list(ctx, search, min_priority, status, sort, desc).await,
    }
}

async fn list(
    ctx: &Ctx,
    search: Option<String>,
    min_priority: Option<PriorityArg>,
    status: Option<RestockStatusArg>,
    sort: Option<RestockSortArg>,
    desc: bool,
) -> Result<(), CliError> {
    let view = ctx.engine.restock().await;
    if let Some(error) = view.error {
        return Err(CliError::Backend(error));
    }

    let spec = FilterSpec {
        search,
        min_priority: min_priority.map(PriorityArg::into_domain),
        restock_status: status.map(RestockStatusArg::into_domain),
        sort: sort.map(RestockSortArg::into_key),
        descending: desc,
        ..Default::default()
    };
    let items = filter_restock(view.data.unwrap_or_default(), &spec);
    print_json(&items)
}
