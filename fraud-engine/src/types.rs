//! Core types for the fraud engine

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Legacy spellings seen in stored order data, grouped per canonical status.
const PENDING_LITERALS: &[&str] = &["pending", "Pending", "OrderStatus.pending"];
const CONFIRMED_LITERALS: &[&str] = &["confirmed", "Confirmed", "OrderStatus.confirmed"];
const PROCESSING_LITERALS: &[&str] = &["processing", "Processing", "OrderStatus.processing"];
const SHIPPED_LITERALS: &[&str] = &["shipped", "Shipped", "OrderStatus.shipped"];
const OUT_FOR_DELIVERY_LITERALS: &[&str] = &[
    "outForDelivery",
    "OutForDelivery",
    "Out for Delivery",
    "OrderStatus.outForDelivery",
];
const DELIVERED_LITERALS: &[&str] = &["delivered", "Delivered", "OrderStatus.delivered"];
const CANCELLED_LITERALS: &[&str] = &[
    "cancelled",
    "Cancelled",
    "canceled",
    "OrderStatus.cancelled",
];
const RETURNED_LITERALS: &[&str] = &["returned", "Returned", "OrderStatus.returned"];

const PAID_LITERALS: &[&str] = &["paid", "Paid", "PaymentStatus.paid"];
const PAYMENT_PENDING_LITERALS: &[&str] = &["pending", "Pending", "PaymentStatus.pending"];
const FAILED_LITERALS: &[&str] = &["failed", "Failed", "PaymentStatus.failed"];

const RETURN_ISSUE_LITERALS: &[&str] = &["Order Return", "Return", "return"];

/// Order lifecycle status
///
/// Decoded from any known spelling; serialized in canonical camelCase form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// Placed, not yet confirmed
    Pending,
    /// Confirmed by the shop
    Confirmed,
    /// Being prepared
    Processing,
    /// Handed to the carrier
    Shipped,
    /// On the last leg
    OutForDelivery,
    /// Delivered to the customer
    Delivered,
    /// Cancelled before delivery
    Cancelled,
    /// Returned after delivery
    Returned,
    /// Any status the engine does not interpret
    Other(String),
}

impl OrderStatus {
    /// Map a stored status literal to its canonical status
    pub fn from_literal(literal: &str) -> Self {
        let table: [(&[&str], OrderStatus); 8] = [
            (PENDING_LITERALS, OrderStatus::Pending),
            (CONFIRMED_LITERALS, OrderStatus::Confirmed),
            (PROCESSING_LITERALS, OrderStatus::Processing),
            (SHIPPED_LITERALS, OrderStatus::Shipped),
            (OUT_FOR_DELIVERY_LITERALS, OrderStatus::OutForDelivery),
            (DELIVERED_LITERALS, OrderStatus::Delivered),
            (CANCELLED_LITERALS, OrderStatus::Cancelled),
            (RETURNED_LITERALS, OrderStatus::Returned),
        ];

        table
            .into_iter()
            .find(|(literals, _)| literals.contains(&literal))
            .map(|(_, status)| status)
            .unwrap_or_else(|| OrderStatus::Other(literal.to_string()))
    }

    /// Canonical literal
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::OutForDelivery => "outForDelivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Returned => "returned",
            OrderStatus::Other(raw) => raw,
        }
    }

    /// Whether the order was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }
}

impl From<String> for OrderStatus {
    fn from(literal: String) -> Self {
        OrderStatus::from_literal(&literal)
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Payment status of an order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    /// Payment captured
    Paid,
    /// Awaiting payment (also cash on delivery)
    #[default]
    Pending,
    /// Payment attempt failed
    Failed,
    /// Any status the engine does not interpret
    Other(String),
}

impl PaymentStatus {
    /// Map a stored payment literal to its canonical status
    pub fn from_literal(literal: &str) -> Self {
        if PAID_LITERALS.contains(&literal) {
            PaymentStatus::Paid
        } else if PAYMENT_PENDING_LITERALS.contains(&literal) {
            PaymentStatus::Pending
        } else if FAILED_LITERALS.contains(&literal) {
            PaymentStatus::Failed
        } else {
            PaymentStatus::Other(literal.to_string())
        }
    }

    /// Canonical literal
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Other(raw) => raw,
        }
    }

    /// Whether the payment failed
    pub fn is_failed(&self) -> bool {
        matches!(self, PaymentStatus::Failed)
    }
}

impl From<String> for PaymentStatus {
    fn from(literal: String) -> Self {
        PaymentStatus::from_literal(&literal)
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// One purchase transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order ID
    pub id: String,

    /// Order total, currency-agnostic
    pub total_amount: Decimal,

    /// Lifecycle status
    pub status: OrderStatus,

    /// Payment status
    #[serde(default)]
    pub payment_status: PaymentStatus,

    /// When the order was placed, with the offset it was recorded in
    pub order_date: DateTime<FixedOffset>,

    /// Shipping address, free text or structured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<serde_json::Value>,
}

impl Order {
    /// Address key used for distinct-address counting.
    ///
    /// Missing, `null` and empty-string addresses have no key. Object maps
    /// are ordered by key, so structured addresses match regardless of the
    /// key order they arrived in.
    pub fn address_key(&self) -> Option<String> {
        match self.shipping_address.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            value => Some(value.to_string()),
        }
    }
}

/// Canonical issue category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// Return request
    Return,
    /// Anything else
    Other,
}

impl IssueKind {
    /// Classify a free-text issue type (case-sensitive)
    pub fn classify(issue_type: &str) -> Self {
        if RETURN_ISSUE_LITERALS.contains(&issue_type) {
            IssueKind::Return
        } else {
            IssueKind::Other
        }
    }
}

/// Support ticket raised by the customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Issue ID
    pub id: String,

    /// Related order, if the ticket names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Free-text issue type
    pub issue_type: String,

    /// Ticket status
    #[serde(default)]
    pub status: String,

    /// When the ticket was opened
    pub created_at: DateTime<FixedOffset>,
}

impl Issue {
    /// Canonical category of this issue
    pub fn kind(&self) -> IssueKind {
        IssueKind::classify(&self.issue_type)
    }

    /// Whether this issue is a return request
    pub fn is_return(&self) -> bool {
        self.kind() == IssueKind::Return
    }
}

/// Risk score (0-100)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(u8);

impl RiskScore {
    /// Create new risk score (0-100)
    pub fn new(score: u8) -> Self {
        Self(score.min(100))
    }

    /// Create a score from summed points, clamping to 100
    pub fn from_points(points: u32) -> Self {
        Self(u8::try_from(points.min(100)).unwrap_or(100))
    }

    /// Get raw score
    pub fn score(&self) -> u8 {
        self.0
    }
}

/// Ordinal risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    /// Not enough history to judge
    Unknown,
    /// Below 15
    Minimal,
    /// 15-29
    Low,
    /// 30-49
    Medium,
    /// 50-69
    High,
    /// 70 and above
    Critical,
}

impl RiskTier {
    /// Display colour for this tier
    pub fn color(&self) -> RiskColor {
        match self {
            RiskTier::Unknown => RiskColor::Grey,
            RiskTier::Minimal | RiskTier::Low => RiskColor::Green,
            RiskTier::Medium => RiskColor::Yellow,
            RiskTier::High => RiskColor::Orange,
            RiskTier::Critical => RiskColor::Red,
        }
    }
}

/// Display colour attached to a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskColor {
    /// Unknown tier
    Grey,
    /// Minimal and low tiers
    Green,
    /// Medium tier
    Yellow,
    /// High tier
    Orange,
    /// Critical tier
    Red,
}

/// Behavioural signals extracted from a customer history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudIndicators {
    /// Cancelled active orders as a percentage of all orders
    #[serde(with = "rust_decimal::serde::float")]
    pub cancel_rate: Decimal,

    /// Return issues as a percentage of all orders
    #[serde(with = "rust_decimal::serde::float")]
    pub return_rate: Decimal,

    /// All issues as a percentage of all orders
    #[serde(with = "rust_decimal::serde::float")]
    pub issue_rate: Decimal,

    /// Cancelled active orders above the high-value threshold
    pub high_value_cancellations: usize,

    /// Three most recent active orders fall within 24 hours
    pub rapid_order_pattern: bool,

    /// Distinct shipping addresses, when suspicious for the history size
    pub address_changes: usize,

    /// Active orders with a failed payment
    pub payment_failures: usize,

    /// Most orders placed between midnight and 5 AM
    pub suspicious_time_pattern: bool,
}

/// Risk assessment result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Risk score
    pub score: RiskScore,

    /// Risk tier
    pub risk_tier: RiskTier,

    /// Display colour for the tier
    pub risk_color: RiskColor,

    /// Extracted indicators
    pub indicators: FraudIndicators,

    /// Human-readable flags in evaluation order
    pub flags: Vec<String>,

    /// Active plus delivered orders
    pub total_orders: usize,

    /// Cancelled active orders
    pub cancelled_count: usize,

    /// Return issues
    pub return_issue_count: usize,

    /// All issues
    pub issue_count: usize,
}

impl RiskAssessment {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self).map_err(|e| crate::Error::Serialization(e.to_string()))
    }

    /// Serialize to an indented JSON string
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::Error::Serialization(e.to_string()))
    }
}
