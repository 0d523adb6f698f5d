//! Command-line surface for `comanda-cli`.
//! Kept in a shared file so tests can reuse the same definitions as the
//! binary itself.

#![deny(clippy::all, clippy::pedantic)]

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use comanda::config::ClientOverrides;
use comanda::domain::types::{OrderStatus, RestockPriority, RestockStatus, StockLevel};
use comanda::view::{FilterSpec, SortKey};
use time::Date;
use time::macros::format_description;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "comanda-cli", version, about = "Comanda restaurant operations CLI", long_about = None)]
pub struct Cli {
    /// Backend base URL, e.g. <https://pos.example.com>
    #[arg(long, env = "COMANDA_SITE_URL", global = true)]
    pub site: Option<String>,

    /// Tenant identifier sent with every request
    #[arg(long, env = "COMANDA_TENANT_ID", global = true)]
    pub tenant: Option<String>,

    /// Path to file containing the API bearer token
    #[arg(long, env = "COMANDA_API_KEY_FILE", global = true)]
    pub key_file: Option<PathBuf>,

    /// Optional path to a configuration file
    #[arg(long, env = "COMANDA_CONFIG_FILE", global = true)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn overrides(&self) -> ClientOverrides {
        ClientOverrides {
            base_url: self.site.clone(),
            tenant_id: self.tenant.clone(),
            api_key_file: self.key_file.clone(),
            config_file: self.config_file.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inventory listing and export
    Inventory(InventoryArgs),
    /// Restock suggestions
    Restock(RestockArgs),
    /// Order history and point-of-sale sync
    Orders(OrdersArgs),
    /// Sales insights
    Sales(SalesArgs),
    /// Cookbook management
    Cookbook(CookbookArgs),
    /// Stock mutations
    Stock(StockArgs),
    /// Combined morning overview (inventory + restock + today's sales)
    Overview,
    /// Local preferences
    Prefs(PrefsArgs),
}

#[derive(Parser, Debug)]
pub struct InventoryArgs {
    #[command(subcommand)]
    pub action: InventoryCmd,
}

#[derive(Subcommand, Debug)]
pub enum InventoryCmd {
    /// List inventory with optional filters
    List {
        #[command(flatten)]
        filters: InventoryFilterArgs,
    },
    /// Export the (filtered) inventory as CSV
    Export {
        #[command(flatten)]
        filters: InventoryFilterArgs,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Parser, Debug, Default)]
pub struct InventoryFilterArgs {
    /// Case-insensitive search over name, SKU, and category
    #[arg(long)]
    pub search: Option<String>,
    /// Exact category match
    #[arg(long)]
    pub category: Option<String>,
    /// Keep only items at this stock level
    #[arg(long)]
    pub level: Option<StockLevelArg>,
    /// Keep only items untouched for more than this many days
    #[arg(long)]
    pub dead_stock_days: Option<i64>,
    /// Sort key
    #[arg(long)]
    pub sort: Option<InventorySortArg>,
    /// Reverse the sort direction
    #[arg(long, default_value_t = false)]
    pub desc: bool,
}

impl InventoryFilterArgs {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            search: self.search.clone(),
            category: self.category.clone(),
            stock_level: self.level.map(StockLevelArg::into_domain),
            dead_stock_days: self.dead_stock_days,
            sort: self.sort.map(InventorySortArg::into_key),
            descending: self.desc,
            ..Default::default()
        }
    }
}

#[derive(Parser, Debug)]
pub struct RestockArgs {
    #[command(subcommand)]
    pub action: RestockCmd,
}

#[derive(Subcommand, Debug)]
pub enum RestockCmd {
    /// List restock suggestions
    List {
        #[arg(long)]
        search: Option<String>,
        /// Keep items at or above this priority
        #[arg(long)]
        min_priority: Option<PriorityArg>,
        #[arg(long)]
        status: Option<RestockStatusArg>,
        #[arg(long)]
        sort: Option<RestockSortArg>,
        #[arg(long, default_value_t = false)]
        desc: bool,
    },
}

#[derive(Parser, Debug)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub action: OrdersCmd,
}

#[derive(Subcommand, Debug)]
pub enum OrdersCmd {
    /// List orders within a date window
    List {
        #[arg(long, value_parser = parse_date)]
        start: Date,
        #[arg(long, value_parser = parse_date)]
        end: Date,
        #[arg(long)]
        status: Option<OrderStatusArg>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        sort: Option<OrderSortArg>,
        #[arg(long, default_value_t = false)]
        desc: bool,
    },
    /// Pull fresh orders from the upstream point-of-sale
    Sync {
        #[arg(long, value_parser = parse_date)]
        start: Option<Date>,
        #[arg(long, value_parser = parse_date)]
        end: Option<Date>,
    },
}

#[derive(Parser, Debug)]
pub struct SalesArgs {
    #[command(subcommand)]
    pub action: SalesCmd,
}

#[derive(Subcommand, Debug)]
pub enum SalesCmd {
    /// Daily sales summary
    Day {
        #[arg(value_parser = parse_date)]
        date: Date,
    },
    /// Aggregated totals for a window
    Totals {
        #[arg(long, value_parser = parse_date)]
        start: Date,
        #[arg(long, value_parser = parse_date)]
        end: Date,
    },
}

#[derive(Parser, Debug)]
pub struct CookbookArgs {
    #[command(subcommand)]
    pub action: CookbookCmd,
}

#[derive(Subcommand, Debug)]
pub enum CookbookCmd {
    /// List recipes
    List,
    /// Update a recipe; only provided fields change
    Update {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        active: Option<bool>,
    },
}

#[derive(Parser, Debug)]
pub struct StockArgs {
    #[command(subcommand)]
    pub action: StockCmd,
}

#[derive(Subcommand, Debug)]
pub enum StockCmd {
    /// Set the absolute stock level for one SKU
    Update {
        #[arg(long)]
        sku: String,
        #[arg(long)]
        qty: f64,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Parser, Debug)]
pub struct PrefsArgs {
    #[command(subcommand)]
    pub action: PrefsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PrefsCmd {
    /// Show persisted preferences
    Show,
    /// Enable or disable the guided tour
    GuidedTour {
        #[arg(action = clap::ArgAction::Set, value_parser = clap::value_parser!(bool))]
        enabled: bool,
    },
}

// ============================================================================
// Argument enums bridging clap to domain types
// ============================================================================

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StockLevelArg {
    Critical,
    Low,
    Good,
}

impl StockLevelArg {
    pub fn into_domain(self) -> StockLevel {
        match self {
            StockLevelArg::Critical => StockLevel::Critical,
            StockLevelArg::Low => StockLevel::Low,
            StockLevelArg::Good => StockLevel::Good,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Normal,
    High,
    Urgent,
}

impl PriorityArg {
    pub fn into_domain(self) -> RestockPriority {
        match self {
            PriorityArg::Low => RestockPriority::Low,
            PriorityArg::Normal => RestockPriority::Normal,
            PriorityArg::High => RestockPriority::High,
            PriorityArg::Urgent => RestockPriority::Urgent,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RestockStatusArg {
    Pending,
    Ordered,
    Received,
    Cancelled,
}

impl RestockStatusArg {
    pub fn into_domain(self) -> RestockStatus {
        match self {
            RestockStatusArg::Pending => RestockStatus::Pending,
            RestockStatusArg::Ordered => RestockStatus::Ordered,
            RestockStatusArg::Received => RestockStatus::Received,
            RestockStatusArg::Cancelled => RestockStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderStatusArg {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatusArg {
    pub fn into_domain(self) -> OrderStatus {
        match self {
            OrderStatusArg::Pending => OrderStatus::Pending,
            OrderStatusArg::Preparing => OrderStatus::Preparing,
            OrderStatusArg::Ready => OrderStatus::Ready,
            OrderStatusArg::Completed => OrderStatus::Completed,
            OrderStatusArg::Cancelled => OrderStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InventorySortArg {
    Name,
    Category,
    Quantity,
    UpdatedAt,
}

impl InventorySortArg {
    pub fn into_key(self) -> SortKey {
        match self {
            InventorySortArg::Name => SortKey::Name,
            InventorySortArg::Category => SortKey::Category,
            InventorySortArg::Quantity => SortKey::Quantity,
            InventorySortArg::UpdatedAt => SortKey::UpdatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RestockSortArg {
    Name,
    Priority,
    Quantity,
}

impl RestockSortArg {
    pub fn into_key(self) -> SortKey {
        match self {
            RestockSortArg::Name => SortKey::Name,
            RestockSortArg::Priority => SortKey::Priority,
            RestockSortArg::Quantity => SortKey::Quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderSortArg {
    Total,
    PlacedAt,
}

impl OrderSortArg {
    pub fn into_key(self) -> SortKey {
        match self {
            OrderSortArg::Total => SortKey::Total,
            OrderSortArg::PlacedAt => SortKey::PlacedAt,
        }
    }
}

impl fmt::Display for StockLevelArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_domain().as_str())
    }
}

fn parse_date(raw: &str) -> Result<Date, String> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw, &format).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
