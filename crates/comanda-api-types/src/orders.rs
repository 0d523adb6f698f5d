//! Order wire types.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::types::{OrderChannel, OrderStatus};

/// One order as returned by `GET /orders?start_date&end_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDto {
    pub id: Uuid,
    pub status: OrderStatus,
    #[serde(default)]
    pub channel: Option<OrderChannel>,
    pub total: f64,
    #[serde(default)]
    pub items_count: Option<u32>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub placed_at: OffsetDateTime,
}

/// Body of `POST /orders/sync`: asks the backend to pull fresh orders from
/// the upstream point-of-sale for an optional date window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncOrdersRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,
}

/// Payload of a completed order sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOrdersResponse {
    pub imported: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_parses_minimal_payload() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "status": "completed",
            "total": 42.5,
            "placed_at": "2026-03-01T19:04:00Z"
        }"#;
        let order: OrderDto = serde_json::from_str(json).expect("deserialize");
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.channel.is_none());
        assert!(order.items_count.is_none());
    }

    #[test]
    fn empty_sync_request_serializes_to_empty_object() {
        let req = SyncOrdersRequest::default();
        let json = serde_json::to_string(&req).expect("serialize");
        assert_eq!(json, "{}");
    }
}
