//! Shared domain enumerations, aligned with the wire-level enums where the
//! server defines them.

use serde::{Deserialize, Serialize};

pub use comanda_api_types::{OrderChannel, OrderStatus, RestockPriority, RestockStatus};

/// Stock health classification derived from a single item's quantity and its
/// configured thresholds. Never stored server-side; always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    Critical,
    Low,
    Good,
}

impl StockLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            StockLevel::Critical => "critical",
            StockLevel::Low => "low",
            StockLevel::Good => "good",
        }
    }
}

impl TryFrom<&str> for StockLevel {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "critical" => Ok(StockLevel::Critical),
            "low" => Ok(StockLevel::Low),
            "good" => Ok(StockLevel::Good),
            _ => Err(()),
        }
    }
}
