use serde::{Deserialize, Serialize};

use crate::time::null_as_default;

/// Percentage at which the near-limit warning is raised by default.
pub const NEAR_LIMIT_PERCENT: u32 = 80;

/// Last known daily usage quota for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    pub daily_limit: u64,
    pub used_today: u64,
    #[serde(default)]
    pub last_reset: Option<String>,
}

impl QuotaSnapshot {
    pub fn new(used_today: u64, daily_limit: u64) -> Self {
        Self {
            user_id: String::new(),
            daily_limit,
            used_today,
            last_reset: None,
        }
    }

    /// Rounded usage percentage. A zero limit reads as 100.
    pub fn percentage(&self) -> u32 {
        if self.daily_limit == 0 {
            return 100;
        }
        let percent = (self.used_today as f64 / self.daily_limit as f64 * 100.0).round();
        percent.min(u32::MAX as f64) as u32
    }

    pub fn remaining(&self) -> u64 {
        self.daily_limit.saturating_sub(self.used_today)
    }

    pub fn is_exhausted(&self) -> bool {
        self.used_today >= self.daily_limit || self.percentage() >= 100
    }

    /// At or above `warning_percent` but not yet exhausted.
    pub fn is_near_limit(&self, warning_percent: u32) -> bool {
        !self.is_exhausted() && self.percentage() >= warning_percent
    }
}
