//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type identifying one monthly
//! payroll cycle.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A (month, year) pair identifying one payroll cycle.
///
/// Periods order chronologically: year first, then month.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
///
/// let period = PayPeriod::new(1, 2026).unwrap();
/// assert_eq!(period.previous(), PayPeriod::new(12, 2025).unwrap());
/// assert_eq!(period.to_string(), "1/2026");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The calendar year.
    pub year: i32,
    /// The calendar month, 1-12.
    pub month: u32,
}

impl PayPeriod {
    /// Creates a period, rejecting months outside 1-12.
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::validation(
                "month",
                format!("{} is not between 1 and 12", month),
            ));
        }
        Ok(Self { year, month })
    }

    /// Checks that the year lies within `[min_year, max_year]`.
    pub fn ensure_year_within(&self, min_year: i32, max_year: i32) -> EngineResult<()> {
        if self.year < min_year || self.year > max_year {
            return Err(EngineError::validation(
                "year",
                format!(
                    "{} is outside the supported range {}-{}",
                    self.year, min_year, max_year
                ),
            ));
        }
        Ok(())
    }

    /// Returns the previous calendar month.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Returns the last day of the period.
    pub fn last_day(&self) -> NaiveDate {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next.and_then(|d| d.pred_opt()).unwrap_or(NaiveDate::MAX)
    }

    /// Returns `count` consecutive periods ending with (and including) this one,
    /// oldest first.
    pub fn trailing(&self, count: u32) -> Vec<PayPeriod> {
        let mut periods = Vec::with_capacity(count as usize);
        let mut current = *self;
        for _ in 0..count {
            periods.push(current);
            current = current.previous();
        }
        periods.reverse();
        periods
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}
