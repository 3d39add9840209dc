//! Fraud Engine
//!
//! Behavioural risk scoring over a customer's order and support history

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bands;
pub mod classifier;
pub mod config;
pub mod error;
pub mod history;
pub mod indicators;
pub mod scoring;
pub mod types;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use history::{CustomerHistory, NormalizedHistory};
pub use scoring::{Explanation, RiskScorer};
pub use types::*;
