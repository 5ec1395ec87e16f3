// 📅 Time Series - monthly credit and budget records owned by an account
//
// At most one record per (year, month) per account. Records are kept sorted
// by period so lookups can binary search.

use crate::error::BuildError;
use crate::options::TimeSeriesPolicy;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// PERIOD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Returns `None` when the month is outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Period { year, month })
        } else {
            None
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Period {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Period::of(date) == *self
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

pub trait PeriodRecord {
    fn period(&self) -> Period;
}

// ============================================================================
// RECORDS
// ============================================================================

/// Credit limit of a balance account for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRecord {
    pub period: Period,
    pub credit: f64,
}

/// Planned income and expenses of a budget account for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    pub period: Period,
    pub income: f64,
    pub expenses: f64,
}

impl BudgetRecord {
    /// Net budget (income minus expenses)
    pub fn budget(&self) -> f64 {
        self.income - self.expenses
    }
}

impl PeriodRecord for CreditRecord {
    fn period(&self) -> Period {
        self.period
    }
}

impl PeriodRecord for BudgetRecord {
    fn period(&self) -> Period {
        self.period
    }
}

// ============================================================================
// SERIES OPERATIONS
// ============================================================================

/// Insert `record` keeping the series sorted and unique per period.
///
/// Returns true when an existing record for the same period was replaced.
pub(crate) fn merge<R: PeriodRecord>(
    records: &mut Vec<R>,
    record: R,
    policy: TimeSeriesPolicy,
    account: &str,
) -> Result<bool, BuildError> {
    let period = record.period();
    match records.binary_search_by_key(&period, |r| r.period()) {
        Ok(position) => match policy {
            TimeSeriesPolicy::Replace => {
                records[position] = record;
                Ok(true)
            }
            TimeSeriesPolicy::Reject => Err(BuildError::DuplicateTimeSeriesEntry {
                account: account.to_string(),
                year: period.year,
                month: period.month,
            }),
        },
        Err(position) => {
            records.insert(position, record);
            Ok(false)
        }
    }
}

/// Record for exactly `period`
pub fn record_for<R: PeriodRecord>(records: &[R], period: Period) -> Option<&R> {
    records
        .binary_search_by_key(&period, |r| r.period())
        .ok()
        .map(|position| &records[position])
}

/// Latest record at or before `period`
pub fn latest_at<R: PeriodRecord>(records: &[R], period: Period) -> Option<&R> {
    let end = records.partition_point(|r| r.period() <= period);
    end.checked_sub(1).map(|position| &records[position])
}
