//! Customer history input and normalization

use crate::{Error, Issue, Order, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;

/// Everything the engine knows about one customer
///
/// Absent or `null` lists decode as empty. `orders` is accepted as the
/// legacy name of `activeOrders`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerHistory {
    /// Active and recent orders
    #[serde(default, alias = "orders", deserialize_with = "null_as_empty")]
    pub active_orders: Vec<Order>,

    /// Delivered orders
    #[serde(default, deserialize_with = "null_as_empty")]
    pub delivered_orders: Vec<Order>,

    /// Support issues
    #[serde(default, deserialize_with = "null_as_empty")]
    pub issues: Vec<Issue>,

    /// Analytics summary, carried for context and never scored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<serde_json::Value>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl CustomerHistory {
    /// Decode and validate a history from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let history: CustomerHistory = serde_json::from_str(json)?;
        history.validate()?;
        Ok(history)
    }

    /// Decode and validate a history from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let history: CustomerHistory = serde_json::from_reader(reader)?;
        history.validate()?;
        Ok(history)
    }

    /// Reject records the engine cannot score.
    ///
    /// Timestamps and totals are already type-checked by decoding; this adds
    /// the checks types cannot express.
    pub fn validate(&self) -> Result<()> {
        for order in self.active_orders.iter().chain(&self.delivered_orders) {
            if order.id.trim().is_empty() {
                return Err(Error::InvalidRecord {
                    id: "<order>".to_string(),
                    reason: "order ID is empty".to_string(),
                });
            }
            if order.total_amount < Decimal::ZERO {
                return Err(Error::InvalidRecord {
                    id: order.id.clone(),
                    reason: format!("negative order total {}", order.total_amount),
                });
            }
        }

        for issue in &self.issues {
            if issue.id.trim().is_empty() {
                return Err(Error::InvalidRecord {
                    id: "<issue>".to_string(),
                    reason: "issue ID is empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Borrow this history as the normalized view the indicators read
    pub fn normalize(&self) -> NormalizedHistory<'_> {
        NormalizedHistory::new(self)
    }
}

/// Read-only view of a history with its order denominator
#[derive(Debug, Clone, Copy)]
pub struct NormalizedHistory<'a> {
    /// Active orders
    pub active: &'a [Order],
    /// Delivered orders
    pub delivered: &'a [Order],
    /// Support issues
    pub issues: &'a [Issue],
    /// Active plus delivered order count
    pub total_orders: usize,
}

impl<'a> NormalizedHistory<'a> {
    /// Build the view
    pub fn new(history: &'a CustomerHistory) -> Self {
        Self {
            active: &history.active_orders,
            delivered: &history.delivered_orders,
            issues: &history.issues,
            total_orders: history.active_orders.len() + history.delivered_orders.len(),
        }
    }

    /// No orders at all; rates are undefined
    pub fn is_empty(&self) -> bool {
        self.total_orders == 0
    }

    /// Active orders followed by delivered orders
    pub fn all_orders(&self) -> impl Iterator<Item = &'a Order> + 'a {
        self.active.iter().chain(self.delivered.iter())
    }

    /// Cancelled active orders
    pub fn cancelled_orders(&self) -> impl Iterator<Item = &'a Order> + 'a {
        self.active.iter().filter(|o| o.status.is_cancelled())
    }

    /// Return-type issues
    pub fn return_issues(&self) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(|i| i.is_return())
    }

    /// `count` as a percentage of all orders.
    ///
    /// Computed as `count * 100 / total` so whole-number percentages stay exact.
    pub fn rate(&self, count: usize) -> Decimal {
        if self.total_orders == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(count) * Decimal::ONE_HUNDRED / Decimal::from(self.total_orders)
    }
}
