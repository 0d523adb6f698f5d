//! Wire-level enumerations shared across endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderChannel {
    DineIn,
    Takeaway,
    Delivery,
    Online,
}

impl OrderChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderChannel::DineIn => "dine_in",
            OrderChannel::Takeaway => "takeaway",
            OrderChannel::Delivery => "delivery",
            OrderChannel::Online => "online",
        }
    }
}

/// Restock urgency, ordered from least to most pressing so that `Ord`
/// follows operational priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestockPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl RestockPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            RestockPriority::Low => "low",
            RestockPriority::Normal => "normal",
            RestockPriority::High => "high",
            RestockPriority::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestockStatus {
    Pending,
    Ordered,
    Received,
    Cancelled,
}

impl RestockStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RestockStatus::Pending => "pending",
            RestockStatus::Ordered => "ordered",
            RestockStatus::Received => "received",
            RestockStatus::Cancelled => "cancelled",
        }
    }
}
