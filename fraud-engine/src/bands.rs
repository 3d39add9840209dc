//! Ordered point bands per indicator
//!
//! Each table is evaluated top to bottom and the first matching band wins,
//! so tables are listed from most to least severe.

use crate::FraudIndicators;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How a value is compared against a band threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// value > threshold
    Above,
    /// value >= threshold
    AtLeast,
}

impl Comparison {
    fn matches(self, value: Decimal, threshold: Decimal) -> bool {
        match self {
            Comparison::Above => value > threshold,
            Comparison::AtLeast => value >= threshold,
        }
    }
}

/// How a band describes itself in the flag list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagTemplate {
    /// `"<label>: 12.5%"`
    Rate(&'static str),
    /// `"<n> <noun>"`
    Count(&'static str),
    /// `"<label>: <n>"`
    Labelled(&'static str),
    /// Fixed text
    Fixed(&'static str),
}

impl FlagTemplate {
    /// Render the flag for an indicator value
    pub fn render(&self, value: Decimal) -> String {
        match self {
            FlagTemplate::Rate(label) => format!("{}: {}%", label, one_decimal(value)),
            FlagTemplate::Count(noun) => format!("{} {}", value.normalize(), noun),
            FlagTemplate::Labelled(label) => format!("{}: {}", label, value.normalize()),
            FlagTemplate::Fixed(text) => (*text).to_string(),
        }
    }
}

/// Percentages are shown with exactly one decimal place, halves rounded up.
fn one_decimal(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    rounded.to_string()
}

/// One row of a band table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// Comparison against `threshold`
    pub comparison: Comparison,
    /// Band boundary
    pub threshold: Decimal,
    /// Points added when the band matches
    pub points: u8,
    /// Flag emitted when the band matches, if any
    pub flag: Option<FlagTemplate>,
}

const fn band(comparison: Comparison, threshold: Decimal, points: u8, flag: Option<FlagTemplate>) -> Band {
    Band {
        comparison,
        threshold,
        points,
        flag,
    }
}

use Comparison::{Above, AtLeast};

/// Cancellation rate, max 25 points
pub const CANCEL_RATE_BANDS: &[Band] = &[
    band(Above, dec!(50), 25, Some(FlagTemplate::Rate("High cancellation rate"))),
    band(Above, dec!(30), 15, Some(FlagTemplate::Rate("Elevated cancellation rate"))),
    band(Above, dec!(15), 8, None),
];

/// Return rate, max 20 points
pub const RETURN_RATE_BANDS: &[Band] = &[
    band(Above, dec!(40), 20, Some(FlagTemplate::Rate("High return rate"))),
    band(Above, dec!(25), 12, Some(FlagTemplate::Rate("Elevated return rate"))),
    band(Above, dec!(10), 6, None),
];

/// Issue rate, max 15 points
pub const ISSUE_RATE_BANDS: &[Band] = &[
    band(Above, dec!(50), 15, Some(FlagTemplate::Rate("High issue rate"))),
    band(Above, dec!(30), 10, None),
    band(Above, dec!(15), 5, None),
];

/// High-value cancellations, max 15 points; only the top band is flagged
pub const HIGH_VALUE_CANCELLATION_BANDS: &[Band] = &[
    band(AtLeast, dec!(3), 15, Some(FlagTemplate::Count("high-value cancellations"))),
    band(AtLeast, dec!(2), 10, None),
    band(AtLeast, dec!(1), 5, None),
];

/// Rapid order placement, 10 points
pub const RAPID_ORDER_BANDS: &[Band] = &[band(
    AtLeast,
    dec!(1),
    10,
    Some(FlagTemplate::Fixed("Rapid order placement detected")),
)];

/// Distinct shipping addresses, max 10 points
pub const ADDRESS_CHANGE_BANDS: &[Band] = &[
    band(Above, dec!(5), 10, Some(FlagTemplate::Labelled("Multiple addresses"))),
    band(Above, dec!(3), 6, None),
];

/// Payment failures, max 5 points; only the top band is flagged
pub const PAYMENT_FAILURE_BANDS: &[Band] = &[
    band(Above, dec!(3), 5, Some(FlagTemplate::Count("payment failures"))),
    band(Above, dec!(1), 3, None),
];

/// Late-night ordering, 5 points
pub const TIME_PATTERN_BANDS: &[Band] = &[band(
    AtLeast,
    dec!(1),
    5,
    Some(FlagTemplate::Fixed("Unusual ordering time pattern")),
)];

/// The eight scored indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Indicator {
    /// Cancellation rate
    CancelRate,
    /// Return rate
    ReturnRate,
    /// Issue rate
    IssueRate,
    /// High-value cancellations
    HighValueCancellations,
    /// Rapid order placement
    RapidOrderPattern,
    /// Distinct shipping addresses
    AddressChanges,
    /// Payment failures
    PaymentFailures,
    /// Late-night ordering
    SuspiciousTimePattern,
}

impl Indicator {
    /// Order in which indicators are scored and flags emitted
    pub const EVALUATION_ORDER: [Indicator; 8] = [
        Indicator::CancelRate,
        Indicator::ReturnRate,
        Indicator::IssueRate,
        Indicator::HighValueCancellations,
        Indicator::RapidOrderPattern,
        Indicator::AddressChanges,
        Indicator::PaymentFailures,
        Indicator::SuspiciousTimePattern,
    ];

    /// Band table for this indicator
    pub fn bands(&self) -> &'static [Band] {
        match self {
            Indicator::CancelRate => CANCEL_RATE_BANDS,
            Indicator::ReturnRate => RETURN_RATE_BANDS,
            Indicator::IssueRate => ISSUE_RATE_BANDS,
            Indicator::HighValueCancellations => HIGH_VALUE_CANCELLATION_BANDS,
            Indicator::RapidOrderPattern => RAPID_ORDER_BANDS,
            Indicator::AddressChanges => ADDRESS_CHANGE_BANDS,
            Indicator::PaymentFailures => PAYMENT_FAILURE_BANDS,
            Indicator::SuspiciousTimePattern => TIME_PATTERN_BANDS,
        }
    }

    /// This indicator's value as a number; booleans read as 0 or 1
    pub fn value(&self, indicators: &FraudIndicators) -> Decimal {
        match self {
            Indicator::CancelRate => indicators.cancel_rate,
            Indicator::ReturnRate => indicators.return_rate,
            Indicator::IssueRate => indicators.issue_rate,
            Indicator::HighValueCancellations => Decimal::from(indicators.high_value_cancellations),
            Indicator::RapidOrderPattern => Decimal::from(u8::from(indicators.rapid_order_pattern)),
            Indicator::AddressChanges => Decimal::from(indicators.address_changes),
            Indicator::PaymentFailures => Decimal::from(indicators.payment_failures),
            Indicator::SuspiciousTimePattern => {
                Decimal::from(u8::from(indicators.suspicious_time_pattern))
            }
        }
    }

    /// Maximum points this indicator can contribute
    pub fn max_points(&self) -> u8 {
        self.bands().iter().map(|b| b.points).max().unwrap_or(0)
    }

    /// First band matching `value`, if any
    pub fn matching_band(&self, value: Decimal) -> Option<&'static Band> {
        self.bands()
            .iter()
            .find(|b| b.comparison.matches(value, b.threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_descend_in_severity() {
        for indicator in Indicator::EVALUATION_ORDER {
            let bands = indicator.bands();
            for pair in bands.windows(2) {
                assert!(pair[0].threshold > pair[1].threshold, "{indicator:?}");
                assert!(pair[0].points > pair[1].points, "{indicator:?}");
            }
        }
    }

    #[test]
    fn test_max_points_per_indicator() {
        let caps: Vec<u8> = Indicator::EVALUATION_ORDER
            .iter()
            .map(|i| i.max_points())
            .collect();
        assert_eq!(caps, vec![25, 20, 15, 15, 10, 10, 5, 5]);
    }

    #[test]
    fn test_rate_band_boundaries() {
        let cancel = Indicator::CancelRate;
        assert_eq!(cancel.matching_band(dec!(50)).map(|b| b.points), Some(15));
        assert_eq!(cancel.matching_band(dec!(50.01)).map(|b| b.points), Some(25));
        assert_eq!(cancel.matching_band(dec!(30)).map(|b| b.points), Some(8));
        assert_eq!(cancel.matching_band(dec!(15)), None);
    }

    #[test]
    fn test_count_band_boundaries() {
        let hvc = Indicator::HighValueCancellations;
        assert_eq!(hvc.matching_band(dec!(0)), None);
        assert_eq!(hvc.matching_band(dec!(1)).map(|b| b.points), Some(5));
        assert_eq!(hvc.matching_band(dec!(7)).map(|b| b.points), Some(15));

        let payments = Indicator::PaymentFailures;
        assert_eq!(payments.matching_band(dec!(1)), None);
        assert_eq!(payments.matching_band(dec!(2)).map(|b| b.points), Some(3));
        assert_eq!(payments.matching_band(dec!(4)).map(|b| b.points), Some(5));
    }

    #[test]
    fn test_flag_rendering() {
        let rate = FlagTemplate::Rate("High cancellation rate");
        assert_eq!(rate.render(dec!(100)), "High cancellation rate: 100.0%");
        assert_eq!(
            rate.render(Decimal::from(2) * Decimal::ONE_HUNDRED / Decimal::from(3)),
            "High cancellation rate: 66.7%"
        );
        assert_eq!(rate.render(dec!(33.35)), "High cancellation rate: 33.4%");

        assert_eq!(
            FlagTemplate::Count("payment failures").render(dec!(4)),
            "4 payment failures"
        );
        assert_eq!(
            FlagTemplate::Labelled("Multiple addresses").render(dec!(6)),
            "Multiple addresses: 6"
        );
    }
}
