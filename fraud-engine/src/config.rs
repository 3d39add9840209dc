//! Engine configuration

use crate::{Error, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i32 = 24 * 60 * 60;

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Shop offset from UTC in minutes used to read order hours.
    ///
    /// When unset, each order's hour is read in the offset it was recorded in.
    #[serde(default)]
    pub local_offset_minutes: Option<i32>,
}

impl EngineConfig {
    /// Resolve the configured offset
    pub fn local_offset(&self) -> Result<Option<FixedOffset>> {
        let Some(minutes) = self.local_offset_minutes else {
            return Ok(None);
        };

        minutes
            .checked_mul(60)
            .filter(|secs| secs.abs() < SECONDS_PER_DAY)
            .and_then(FixedOffset::east_opt)
            .map(Some)
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "local_offset_minutes {} is outside ±24h",
                    minutes
                ))
            })
    }
}
