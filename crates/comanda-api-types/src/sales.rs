//! Sales-insight wire types.

use serde::{Deserialize, Serialize};
use time::Date;

/// Daily sales summary as returned by `GET /sales/{date}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesDayDto {
    pub date: Date,
    pub total: f64,
    pub order_count: u32,
    #[serde(default)]
    pub avg_ticket: Option<f64>,
}

/// Aggregated totals as returned by `GET /sales/total-sales?start_date&end_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesTotalsDto {
    pub start_date: Date,
    pub end_date: Date,
    pub total: f64,
    pub order_count: u32,
    /// Per-day breakdown; omitted by older backends.
    #[serde(default)]
    pub by_day: Option<Vec<SalesDayDto>>,
}
