//! Infrastructure concerns shared by the library and the CLI.

pub mod error;
pub mod telemetry;
