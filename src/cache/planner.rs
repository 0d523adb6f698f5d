//! Invalidation plan generation.
//!
//! Merges a batch of write events into one deduplicated execution plan:
//! which tags to invalidate and which hot resources to prime afterwards.

use std::collections::HashSet;
use std::fmt;

use super::events::{WriteEvent, WriteKind};
use super::keys::ResourceTag;

/// Actions to execute for cache consistency after a batch of writes.
#[derive(Debug, Default)]
pub struct InvalidationPlan {
    /// Tags whose entries return to `Idle`.
    pub invalidate_tags: HashSet<ResourceTag>,

    /// Whether to refetch the inventory list after invalidating.
    pub prime_inventory: bool,
    /// Whether to refetch the restock list after invalidating.
    pub prime_restock: bool,
    /// Whether to refetch the cookbook after invalidating.
    pub prime_recipes: bool,
}

impl fmt::Display for InvalidationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self
            .invalidate_tags
            .iter()
            .map(|tag| tag.as_str())
            .collect();
        tags.sort_unstable();
        write!(
            f,
            "InvalidationPlan {{ tags: [{}], prime_inventory: {}, prime_restock: {}, \
             prime_recipes: {} }}",
            tags.join(", "),
            self.prime_inventory,
            self.prime_restock,
            self.prime_recipes,
        )
    }
}

impl InvalidationPlan {
    /// Merge a drained event batch into one plan.
    ///
    /// Events are deduplicated by id; the union of their effects is taken.
    /// Epoch order does not matter for the tag set (invalidation is
    /// idempotent) but duplicate ids must not double-count primes.
    pub fn from_events(events: Vec<WriteEvent>) -> Self {
        let mut plan = Self::default();
        let mut seen_ids = HashSet::new();

        for event in events {
            if !seen_ids.insert(event.id) {
                continue;
            }
            match &event.kind {
                WriteKind::StockUpdated { .. } => {
                    plan.invalidate_tags.insert(ResourceTag::Inventory);
                    plan.prime_inventory = true;
                    plan.prime_restock = true;
                }
                WriteKind::OrdersSynced { .. } => {
                    // Sales aggregates derive from orders; both go stale.
                    plan.invalidate_tags.insert(ResourceTag::Orders);
                    plan.invalidate_tags.insert(ResourceTag::Sales);
                }
                WriteKind::RecipeUpdated { .. } => {
                    plan.invalidate_tags.insert(ResourceTag::Cookbook);
                    plan.prime_recipes = true;
                }
                WriteKind::PrimeOnStartup => {
                    plan.prime_inventory = true;
                    plan.prime_restock = true;
                    plan.prime_recipes = true;
                }
            }
        }

        plan
    }

    /// Whether any prime action is requested.
    pub fn has_prime_actions(&self) -> bool {
        self.prime_inventory || self.prime_restock || self.prime_recipes
    }

    /// Whether the plan does anything at all.
    pub fn is_empty(&self) -> bool {
        self.invalidate_tags.is_empty() && !self.has_prime_actions()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn stock_update_invalidates_inventory_and_primes() {
        let events = vec![WriteEvent::new(
            WriteKind::StockUpdated {
                sku: "TOM-001".to_string(),
            },
            0,
        )];
        let plan = InvalidationPlan::from_events(events);

        assert!(plan.invalidate_tags.contains(&ResourceTag::Inventory));
        assert!(!plan.invalidate_tags.contains(&ResourceTag::Orders));
        assert!(plan.prime_inventory);
        assert!(plan.prime_restock);
        assert!(!plan.prime_recipes);
    }

    #[test]
    fn orders_sync_invalidates_orders_and_sales() {
        let events = vec![WriteEvent::new(WriteKind::OrdersSynced { imported: 12 }, 0)];
        let plan = InvalidationPlan::from_events(events);

        assert!(plan.invalidate_tags.contains(&ResourceTag::Orders));
        assert!(plan.invalidate_tags.contains(&ResourceTag::Sales));
        assert!(!plan.has_prime_actions());
    }

    #[test]
    fn duplicate_event_ids_merge_once() {
        let event = WriteEvent::new(
            WriteKind::RecipeUpdated {
                recipe_id: Uuid::nil(),
            },
            0,
        );
        let plan = InvalidationPlan::from_events(vec![event.clone(), event]);

        assert_eq!(plan.invalidate_tags.len(), 1);
        assert!(plan.prime_recipes);
    }

    #[test]
    fn mixed_batch_takes_union() {
        let events = vec![
            WriteEvent::new(
                WriteKind::StockUpdated {
                    sku: "TOM-001".to_string(),
                },
                0,
            ),
            WriteEvent::new(WriteKind::OrdersSynced { imported: 3 }, 1),
        ];
        let plan = InvalidationPlan::from_events(events);

        assert_eq!(plan.invalidate_tags.len(), 3);
        assert!(plan.prime_inventory);
    }

    #[test]
    fn empty_batch_is_empty_plan() {
        let plan = InvalidationPlan::from_events(Vec::new());
        assert!(plan.is_empty());
    }

    #[test]
    fn display_is_deterministic() {
        let events = vec![WriteEvent::new(WriteKind::OrdersSynced { imported: 1 }, 0)];
        let plan = InvalidationPlan::from_events(events);
        assert_eq!(
            plan.to_string(),
            "InvalidationPlan { tags: [orders, sales], prime_inventory: false, \
             prime_restock: false, prime_recipes: false }"
        );
    }
}
