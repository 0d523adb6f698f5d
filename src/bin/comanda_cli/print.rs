#![deny(clippy::all, clippy::pedantic)]

use comanda::sync::ResourceView;
use serde::Serialize;

use crate::context::CliError;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out =
        serde_json::to_string_pretty(value).map_err(|e| CliError::Render(e.to_string()))?;
    println!("{out}");
    Ok(())
}

/// Render a resource view: data on success, a typed failure otherwise.
///
/// An errored view becomes a CLI error so the exit code reflects it;
/// "couldn't load" must stay distinguishable from "loaded, empty".
pub fn print_view<T: Serialize>(view: &ResourceView<T>) -> Result<(), CliError> {
    if let Some(error) = &view.error {
        return Err(CliError::Backend(error.clone()));
    }
    let body = serde_json::json!({
        "status": view.status.as_str(),
        "fetched_at": view.fetched_at.map(|ts| ts.to_string()),
        "data": view.data,
    });
    print_json(&body)
}
