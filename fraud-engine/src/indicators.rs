//! Behavioural indicator extraction
//!
//! Each indicator is computed independently from the normalized history.

use crate::history::NormalizedHistory;
use crate::{FraudIndicators, Order};
use chrono::{Duration, FixedOffset, Timelike};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;
use std::ops::Range;
use tracing::debug;

/// Order total above which a cancellation counts as high-value
pub const HIGH_VALUE_THRESHOLD: Decimal = dec!(5000);

/// Active orders needed before the rapid-order check runs
pub const RAPID_ORDER_MIN_ORDERS: usize = 3;

/// Window the most recent orders must fall inside to count as rapid
pub const RAPID_ORDER_WINDOW_HOURS: i64 = 24;

/// Distinct addresses must exceed this to be recorded
pub const ADDRESS_DISTINCT_FLOOR: usize = 3;

/// Histories this long or longer never record address changes
pub const ADDRESS_HISTORY_CEILING: usize = 10;

/// Local hours treated as late night
pub const LATE_NIGHT_HOURS: Range<u32> = 0..5;

/// Computes [`FraudIndicators`] from a normalized history
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorExtractor {
    local_offset: Option<FixedOffset>,
}

impl IndicatorExtractor {
    /// Create an extractor.
    ///
    /// With `local_offset` set, order hours are read in that offset instead
    /// of the offset each timestamp was recorded in.
    pub fn new(local_offset: Option<FixedOffset>) -> Self {
        Self { local_offset }
    }

    /// Extract all eight indicators
    pub fn extract(&self, history: &NormalizedHistory<'_>) -> FraudIndicators {
        let cancelled = history.cancelled_orders().count();
        let returns = history.return_issues().count();

        let indicators = FraudIndicators {
            cancel_rate: history.rate(cancelled),
            return_rate: history.rate(returns),
            issue_rate: history.rate(history.issues.len()),
            high_value_cancellations: high_value_cancellations(history),
            rapid_order_pattern: rapid_order_pattern(history.active),
            address_changes: address_changes(history),
            payment_failures: payment_failures(history.active),
            suspicious_time_pattern: self.suspicious_time_pattern(history),
        };

        debug!(
            total_orders = history.total_orders,
            cancel_rate = %indicators.cancel_rate,
            return_rate = %indicators.return_rate,
            issue_rate = %indicators.issue_rate,
            high_value_cancellations = indicators.high_value_cancellations,
            rapid_order_pattern = indicators.rapid_order_pattern,
            address_changes = indicators.address_changes,
            payment_failures = indicators.payment_failures,
            suspicious_time_pattern = indicators.suspicious_time_pattern,
            "Indicators extracted"
        );

        indicators
    }

    /// More than half of all orders placed in the late-night window
    fn suspicious_time_pattern(&self, history: &NormalizedHistory<'_>) -> bool {
        let late_night = history
            .all_orders()
            .filter(|o| LATE_NIGHT_HOURS.contains(&self.local_hour(o)))
            .count();

        late_night * 2 > history.total_orders
    }

    fn local_hour(&self, order: &Order) -> u32 {
        match self.local_offset {
            Some(offset) => order.order_date.with_timezone(&offset).hour(),
            None => order.order_date.hour(),
        }
    }
}

fn high_value_cancellations(history: &NormalizedHistory<'_>) -> usize {
    history
        .cancelled_orders()
        .filter(|o| o.total_amount > HIGH_VALUE_THRESHOLD)
        .count()
}

/// Three most recent active orders span less than the rapid window
fn rapid_order_pattern(active: &[Order]) -> bool {
    if active.len() < RAPID_ORDER_MIN_ORDERS {
        return false;
    }

    let mut recent: Vec<&Order> = active.iter().collect();
    recent.sort_by(|a, b| b.order_date.cmp(&a.order_date));

    let newest = recent[0].order_date;
    let oldest = recent[RAPID_ORDER_MIN_ORDERS - 1].order_date;

    newest - oldest < Duration::hours(RAPID_ORDER_WINDOW_HOURS)
}

/// Distinct shipping addresses, suppressed for long histories
fn address_changes(history: &NormalizedHistory<'_>) -> usize {
    let distinct: BTreeSet<String> = history.all_orders().filter_map(Order::address_key).collect();

    if distinct.len() > ADDRESS_DISTINCT_FLOOR && history.total_orders < ADDRESS_HISTORY_CEILING {
        distinct.len()
    } else {
        0
    }
}

fn payment_failures(active: &[Order]) -> usize {
    active.iter().filter(|o| o.payment_status.is_failed()).count()
}
