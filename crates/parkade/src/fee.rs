//! Hourly fee rules.

use serde::Serialize;

use crate::category::Category;
use crate::registry::Timestamp;

const SECONDS_PER_HOUR: u64 = 3600;

/// Whole hours between entry and exit, rounding any partial hour up.
///
/// Returns `None` when `exited_at` is earlier than `entered_at`.
pub fn billable_hours(entered_at: Timestamp, exited_at: Timestamp) -> Option<u64> {
    let elapsed = exited_at.checked_sub(entered_at)?;
    Some(elapsed.div_ceil(SECONDS_PER_HOUR))
}

/// Flat per-hour rate for each category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeSchedule {
    rates: [u64; Category::COUNT],
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::zero().with_rate(Category::Car, 2).with_rate(Category::Motorcycle, 1)
    }
}

impl FeeSchedule {
    /// A schedule that charges nothing for any category. Use `default()` for the
    /// standard car and motorcycle rates.
    pub fn zero() -> Self {
        Self {
            rates: [0; Category::COUNT],
        }
    }

    pub fn with_rate(mut self, category: Category, per_hour: u64) -> Self {
        self.rates[category.index()] = per_hour;
        self
    }

    pub fn rate(&self, category: Category) -> u64 {
        self.rates[category.index()]
    }

    /// Fee for parking `hours` whole hours. Saturates instead of wrapping.
    pub fn fee(&self, category: Category, hours: u64) -> u64 {
        hours.saturating_mul(self.rate(category))
    }
}
