//! Risk scoring engine
//!
//! Pipeline: normalize history, extract indicators, aggregate band points,
//! classify the score into a tier.

use crate::bands::Indicator;
use crate::classifier::{self, NEW_CUSTOMER_FLAG};
use crate::history::NormalizedHistory;
use crate::indicators::IndicatorExtractor;
use crate::{
    CustomerHistory, EngineConfig, Error, FraudIndicators, Result, RiskAssessment, RiskScore, RiskTier,
};
use serde::Serialize;
use tracing::info;

/// Points one indicator contributed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    /// Indicator that matched a band
    pub indicator: Indicator,
    /// Points added
    pub points: u8,
    /// Flag emitted, if the band carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

/// Summed band points and the flags they produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    /// Raw point total before clamping
    pub points: u32,
    /// Flags in evaluation order
    pub flags: Vec<String>,
    /// One entry per indicator that scored
    pub contributions: Vec<Contribution>,
}

impl Aggregate {
    /// Clamped score
    pub fn score(&self) -> RiskScore {
        RiskScore::from_points(self.points)
    }
}

/// Map every indicator through its band table
pub fn aggregate(indicators: &FraudIndicators) -> Aggregate {
    let mut result = Aggregate::default();

    for indicator in Indicator::EVALUATION_ORDER {
        let value = indicator.value(indicators);
        let Some(band) = indicator.matching_band(value) else {
            continue;
        };

        let flag = band.flag.map(|template| template.render(value));
        if let Some(text) = &flag {
            result.flags.push(text.clone());
        }

        result.points += u32::from(band.points);
        result.contributions.push(Contribution {
            indicator,
            points: band.points,
            flag,
        });
    }

    result
}

/// Assembles a [`RiskAssessment`], keeping flags in evaluation order
#[derive(Debug)]
struct AssessmentBuilder {
    indicators: FraudIndicators,
    score: RiskScore,
    flags: Vec<String>,
    total_orders: usize,
    cancelled_count: usize,
    return_issue_count: usize,
    issue_count: usize,
}

impl AssessmentBuilder {
    fn new(history: &NormalizedHistory<'_>, indicators: FraudIndicators) -> Self {
        Self {
            indicators,
            score: RiskScore::default(),
            flags: Vec::new(),
            total_orders: history.total_orders,
            cancelled_count: history.cancelled_orders().count(),
            return_issue_count: history.return_issues().count(),
            issue_count: history.issues.len(),
        }
    }

    fn aggregate(mut self, aggregate: &Aggregate) -> Self {
        self.score = aggregate.score();
        self.flags.extend(aggregate.flags.iter().cloned());
        self
    }

    fn flag(mut self, flag: &str) -> Self {
        self.flags.push(flag.to_string());
        self
    }

    fn build(self, tier: RiskTier) -> RiskAssessment {
        RiskAssessment {
            score: self.score,
            risk_tier: tier,
            risk_color: tier.color(),
            indicators: self.indicators,
            flags: self.flags,
            total_orders: self.total_orders,
            cancelled_count: self.cancelled_count,
            return_issue_count: self.return_issue_count,
            issue_count: self.issue_count,
        }
    }

    fn classify(mut self) -> RiskAssessment {
        let tier = RiskTier::from(self.score);
        classifier::closing_flags(self.score, self.total_orders, &mut self.flags);
        self.build(tier)
    }
}

/// An assessment with the per-indicator point breakdown behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    /// The assessment
    pub assessment: RiskAssessment,
    /// Raw points before clamping
    pub raw_points: u32,
    /// Indicators that scored, in evaluation order
    pub contributions: Vec<Contribution>,
}

impl Explanation {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Serialize to an indented JSON string
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Risk scorer
///
/// Holds only immutable configuration, so one scorer can serve any number
/// of threads.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    extractor: IndicatorExtractor,
}

impl RiskScorer {
    /// Create new risk scorer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer from configuration
    pub fn with_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            extractor: IndicatorExtractor::new(config.local_offset()?),
        })
    }

    /// Assess a customer's history
    pub fn assess(&self, history: &CustomerHistory) -> RiskAssessment {
        self.explain(history).assessment
    }

    /// Assess a customer's history and keep the point breakdown
    pub fn explain(&self, history: &CustomerHistory) -> Explanation {
        let history = history.normalize();

        if history.is_empty() {
            info!("No orders on record; risk tier unknown");
            let assessment = AssessmentBuilder::new(&history, FraudIndicators::default())
                .flag(NEW_CUSTOMER_FLAG)
                .build(RiskTier::Unknown);
            return Explanation {
                assessment,
                raw_points: 0,
                contributions: Vec::new(),
            };
        }

        let indicators = self.extractor.extract(&history);
        let aggregate = aggregate(&indicators);
        let assessment = AssessmentBuilder::new(&history, indicators)
            .aggregate(&aggregate)
            .classify();

        info!(
            "Fraud score calculated: {} (tier: {:?}) over {} orders",
            assessment.score.score(),
            assessment.risk_tier,
            assessment.total_orders
        );

        Explanation {
            assessment,
            raw_points: aggregate.points,
            contributions: aggregate.contributions,
        }
    }
}
