//! Property-based tests for scoring invariants
//!
//! These tests use proptest to verify:
//! - Bounds: score is always within 0..=100
//! - Classification: tier and colour follow from the score alone
//! - Determinism: identical input yields identical output
//! - Monotonicity: one more high-value cancellation never lowers the score

use chrono::{DateTime, Duration, FixedOffset};
use fraud_engine::{
    CustomerHistory, Issue, Order, OrderStatus, PaymentStatus, RiskScorer, RiskTier,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn epoch() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap()
}

/// Strategy for order totals (two decimal places)
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_500_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for order statuses, legacy spellings included
fn status_strategy() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just("confirmed"),
        Just("shipped"),
        Just("delivered"),
        Just("cancelled"),
        Just("Cancelled"),
        Just("canceled"),
        Just("OrderStatus.cancelled"),
        Just("onHold"),
    ]
    .prop_map(OrderStatus::from_literal)
}

/// Strategy for payment statuses
fn payment_strategy() -> impl Strategy<Value = PaymentStatus> {
    prop_oneof![
        Just("paid"),
        Just("pending"),
        Just("failed"),
        Just("PaymentStatus.failed"),
    ]
    .prop_map(PaymentStatus::from_literal)
}

/// Strategy for shipping addresses, drawn from a small pool
fn address_strategy() -> impl Strategy<Value = Option<serde_json::Value>> {
    prop_oneof![
        Just(None),
        (0u8..8).prop_map(|n| Some(serde_json::json!(format!("{n} Linking Road")))),
    ]
}

/// Strategy for orders at any minute within 60 days
fn order_strategy() -> impl Strategy<Value = Order> {
    (
        amount_strategy(),
        status_strategy(),
        payment_strategy(),
        0i64..(60 * 24 * 60),
        address_strategy(),
    )
        .prop_map(|(total_amount, status, payment_status, minute, shipping_address)| Order {
            id: format!("ORD{minute}"),
            total_amount,
            status,
            payment_status,
            order_date: epoch() + Duration::minutes(minute),
            shipping_address,
        })
}

/// Strategy for support issues
fn issue_strategy() -> impl Strategy<Value = Issue> {
    prop_oneof![
        Just("Order Return"),
        Just("Return"),
        Just("return"),
        Just("Product Quality"),
        Just("Late Delivery"),
    ]
    .prop_map(|issue_type| Issue {
        id: format!("ISS-{issue_type}"),
        order_id: None,
        issue_type: issue_type.to_string(),
        status: "Open".to_string(),
        created_at: epoch(),
    })
}

/// Strategy for arbitrary histories
fn history_strategy() -> impl Strategy<Value = CustomerHistory> {
    (
        prop::collection::vec(order_strategy(), 0..15),
        prop::collection::vec(order_strategy(), 0..15),
        prop::collection::vec(issue_strategy(), 0..12),
    )
        .prop_map(|(active_orders, delivered_orders, issues)| CustomerHistory {
            active_orders,
            delivered_orders,
            issues,
            analytics: None,
        })
}

/// Strategy for daytime, address-free, issue-free histories
///
/// Adding an order changes the order denominator, which can move issue,
/// address and late-night indicators either way. These histories keep
/// only the signals a new cancellation can push upward.
fn daytime_history_strategy() -> impl Strategy<Value = CustomerHistory> {
    let daytime_order = (
        amount_strategy(),
        status_strategy(),
        0i64..60,
        8i64..18,
    )
        .prop_map(|(total_amount, status, day, hour)| Order {
            id: format!("ORD{day}-{hour}"),
            total_amount,
            status,
            payment_status: PaymentStatus::Paid,
            order_date: epoch() + Duration::days(day) + Duration::hours(hour),
            shipping_address: None,
        });

    prop::collection::vec(daytime_order, 1..15).prop_map(|active_orders| CustomerHistory {
        active_orders,
        ..Default::default()
    })
}

proptest! {
    #[test]
    fn prop_score_is_bounded(history in history_strategy()) {
        let assessment = RiskScorer::new().assess(&history);
        prop_assert!(assessment.score.score() <= 100);
        prop_assert!(!assessment.flags.is_empty());
    }

    #[test]
    fn prop_tier_follows_score(history in history_strategy()) {
        let assessment = RiskScorer::new().assess(&history);

        if assessment.total_orders == 0 {
            prop_assert_eq!(assessment.risk_tier, RiskTier::Unknown);
            prop_assert_eq!(assessment.score.score(), 0);
        } else {
            prop_assert_eq!(assessment.risk_tier, RiskTier::from(assessment.score));
        }
        prop_assert_eq!(assessment.risk_color, assessment.risk_tier.color());
    }

    #[test]
    fn prop_assessment_is_deterministic(history in history_strategy()) {
        let scorer = RiskScorer::new();
        let first = scorer.assess(&history);
        let second = scorer.assess(&history.clone());

        prop_assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_counts_pass_through(history in history_strategy()) {
        let assessment = RiskScorer::new().assess(&history);
        prop_assert_eq!(
            assessment.total_orders,
            history.active_orders.len() + history.delivered_orders.len()
        );
        prop_assert_eq!(assessment.issue_count, history.issues.len());
        prop_assert!(assessment.return_issue_count <= assessment.issue_count);
        prop_assert!(assessment.cancelled_count <= history.active_orders.len());
    }

    #[test]
    fn prop_high_value_cancellation_never_lowers_score(
        history in daytime_history_strategy(),
        extra in 5001i64..100_000,
    ) {
        let scorer = RiskScorer::new();
        let before = scorer.assess(&history).score;

        let newest = history
            .active_orders
            .iter()
            .map(|o| o.order_date)
            .max()
            .unwrap_or_else(epoch);
        let mut grown = history.clone();
        grown.active_orders.push(Order {
            id: "HV-EXTRA".to_string(),
            total_amount: Decimal::from(extra),
            status: OrderStatus::Cancelled,
            payment_status: PaymentStatus::Paid,
            order_date: newest,
            shipping_address: None,
        });
        let after = scorer.assess(&grown).score;

        prop_assert!(after >= before, "{:?} -> {:?}", before, after);
    }
}
