//! Resource key definitions.
//!
//! A [`ResourceKey`] uniquely identifies one fetchable resource (endpoint
//! plus parameters) and doubles as the cache index and the deduplication
//! index. Every key belongs to exactly one [`ResourceTag`], the granularity
//! at which write operations invalidate.

use std::fmt;

use time::Date;

use crate::domain::error::DomainError;

/// Inclusive date window for parameterized list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateWindow {
    start: Date,
    end: Date,
}

impl DateWindow {
    /// Build a window, rejecting reversed bounds.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::validation(format!(
                "date window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single_day(day: Date) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Identifies a fetchable resource. Same logical request, same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    /// Full inventory list.
    Inventory,
    /// Restock suggestion list.
    Restock,
    /// Cookbook recipe list.
    Recipes,
    /// Orders within a date window.
    Orders(DateWindow),
    /// Daily sales summary.
    SalesDay(Date),
    /// Aggregated sales totals for a window.
    SalesTotals(DateWindow),
}

impl ResourceKey {
    /// The invalidation category this key belongs to.
    pub fn tag(&self) -> ResourceTag {
        match self {
            ResourceKey::Inventory | ResourceKey::Restock => ResourceTag::Inventory,
            ResourceKey::Recipes => ResourceTag::Cookbook,
            ResourceKey::Orders(_) => ResourceTag::Orders,
            ResourceKey::SalesDay(_) | ResourceKey::SalesTotals(_) => ResourceTag::Sales,
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKey::Inventory => write!(f, "inventory"),
            ResourceKey::Restock => write!(f, "restock"),
            ResourceKey::Recipes => write!(f, "recipes"),
            ResourceKey::Orders(window) => write!(f, "orders[{window}]"),
            ResourceKey::SalesDay(date) => write!(f, "sales[{date}]"),
            ResourceKey::SalesTotals(window) => write!(f, "sales-totals[{window}]"),
        }
    }
}

/// Logical server-side category shared by overlapping resource keys.
///
/// A write that changes inventory invalidates every inventory-backed key,
/// however many parameterized variants are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceTag {
    Inventory,
    Orders,
    Sales,
    Cookbook,
}

impl ResourceTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceTag::Inventory => "inventory",
            ResourceTag::Orders => "orders",
            ResourceTag::Sales => "sales",
            ResourceTag::Cookbook => "cookbook",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn same_parameters_same_key() {
        let w1 = DateWindow::new(date!(2026 - 03 - 01), date!(2026 - 03 - 07)).expect("window");
        let w2 = DateWindow::new(date!(2026 - 03 - 01), date!(2026 - 03 - 07)).expect("window");
        assert_eq!(ResourceKey::Orders(w1), ResourceKey::Orders(w2));

        let w3 = DateWindow::new(date!(2026 - 03 - 01), date!(2026 - 03 - 08)).expect("window");
        assert_ne!(ResourceKey::Orders(w1), ResourceKey::Orders(w3));
    }

    #[test]
    fn reversed_window_is_rejected() {
        assert!(DateWindow::new(date!(2026 - 03 - 07), date!(2026 - 03 - 01)).is_err());
    }

    #[test]
    fn keys_map_to_tags() {
        assert_eq!(ResourceKey::Inventory.tag(), ResourceTag::Inventory);
        assert_eq!(ResourceKey::Restock.tag(), ResourceTag::Inventory);
        assert_eq!(ResourceKey::Recipes.tag(), ResourceTag::Cookbook);
        assert_eq!(
            ResourceKey::SalesDay(date!(2026 - 03 - 01)).tag(),
            ResourceTag::Sales
        );
    }

    #[test]
    fn display_is_stable_for_logging() {
        let window = DateWindow::new(date!(2026 - 03 - 01), date!(2026 - 03 - 07)).expect("window");
        assert_eq!(
            ResourceKey::Orders(window).to_string(),
            "orders[2026-03-01..2026-03-07]"
        );
    }
}
