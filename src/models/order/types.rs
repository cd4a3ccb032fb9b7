use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflow::{HasStatus, OrderStatus};

/// A checkout order as managed by the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub item_summary: String,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HasStatus<OrderStatus> for Order {
    fn status(&self) -> OrderStatus {
        self.status
    }
}

/// Input for creating an order (seed data, tests).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub item_summary: String,
    pub total: f64,
    #[serde(default = "default_status")]
    pub status: OrderStatus,
}

fn default_status() -> OrderStatus {
    OrderStatus::Pending
}

/// List filter: exact status plus case-insensitive text search.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub q: Option<String>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let needle = q.to_lowercase();
                [&order.customer_name, &order.customer_email, &order.item_summary]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
                    || order.id.to_string() == needle
            }
            _ => true,
        }
    }
}
