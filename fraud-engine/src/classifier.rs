//! Risk tier classification and closing flags

use crate::{RiskScore, RiskTier};

/// Flag for a customer with no orders at all
pub const NEW_CUSTOMER_FLAG: &str = "New customer — insufficient data";

/// Flag for an established, low-risk customer
pub const GOOD_HISTORY_FLAG: &str = "Good order history";

/// Flag used when nothing else was said
pub const NO_INDICATORS_FLAG: &str = "No fraud indicators detected";

/// Scores below this may earn the good-history flag
pub const GOOD_HISTORY_MAX_SCORE: u8 = 30;

/// Orders needed before the good-history flag applies
pub const GOOD_HISTORY_MIN_ORDERS: usize = 5;

/// Lower score bound of each tier, highest first
const TIER_THRESHOLDS: [(u8, RiskTier); 4] = [
    (70, RiskTier::Critical),
    (50, RiskTier::High),
    (30, RiskTier::Medium),
    (15, RiskTier::Low),
];

impl From<RiskScore> for RiskTier {
    fn from(score: RiskScore) -> Self {
        TIER_THRESHOLDS
            .iter()
            .find(|(floor, _)| score.score() >= *floor)
            .map(|(_, tier)| *tier)
            .unwrap_or(RiskTier::Minimal)
    }
}

/// Append the positive and fallback flags after scoring
pub fn closing_flags(score: RiskScore, total_orders: usize, flags: &mut Vec<String>) {
    if score.score() < GOOD_HISTORY_MAX_SCORE && total_orders >= GOOD_HISTORY_MIN_ORDERS {
        flags.push(GOOD_HISTORY_FLAG.to_string());
    }

    if flags.is_empty() {
        flags.push(NO_INDICATORS_FLAG.to_string());
    }
}
