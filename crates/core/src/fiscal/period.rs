//! Accounting period types and the posting gate.
//!
//! Periods are calendar months keyed "YYYY-MM". A posted journal entry may
//! only be created while its date falls inside an open period. Dates with no
//! period row are treated as open by default so the ledger works from day
//! one; the reconciliation audit surfaces months that should be formalized.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use corebook_shared::types::PeriodId;

use crate::ledger::error::LedgerError;

/// Status of an accounting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Period is open for posting.
    Open,
    /// Period is closed, no new postings allowed.
    Closed,
}

impl PeriodStatus {
    /// Returns true if the period accepts new postings.
    #[must_use]
    pub fn allows_posting(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// A monthly accounting period gating writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountingPeriod {
    /// Unique identifier.
    pub id: PeriodId,
    /// Period key in "YYYY-MM" form, unique.
    pub period_key: String,
    /// First day of the month.
    pub start_date: NaiveDate,
    /// Last day of the month.
    pub end_date: NaiveDate,
    /// Current status.
    pub status: PeriodStatus,
    /// When the period was (last) opened.
    pub opened_at: Option<DateTime<Utc>>,
    /// When the period was (last) closed.
    pub closed_at: Option<DateTime<Utc>>,
}

impl AccountingPeriod {
    /// Returns true if postings may be written into this period.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status.allows_posting()
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Derives the period key ("YYYY-MM") for a date.
#[must_use]
pub fn period_key_for(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Returns the first and last day of the month containing `date`.
///
/// # Panics
///
/// Never panics for valid `NaiveDate` inputs; the arithmetic stays within
/// the representable date range.
#[must_use]
pub fn period_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date.with_day(1).expect("day 1 always exists");
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
    .expect("first of month always exists");
    let end = next_month
        .checked_sub_days(Days::new(1))
        .expect("previous day always exists");
    (start, end)
}

/// Gates a posting date against the containing period's status.
///
/// `period_status` is the status of the period containing the date, or
/// `None` when no such period has been formalized. Unknown periods are
/// open-by-default unless the policy flag says otherwise.
///
/// # Errors
///
/// Returns `LedgerError::PeriodClosed` when the period rejects the posting.
pub fn validate_posting_date(
    date: NaiveDate,
    period_status: Option<PeriodStatus>,
    allow_unknown_periods: bool,
) -> Result<(), LedgerError> {
    match period_status {
        Some(status) if status.allows_posting() => Ok(()),
        Some(_) => Err(LedgerError::PeriodClosed {
            period: period_key_for(date),
        }),
        None if allow_unknown_periods => Ok(()),
        None => Err(LedgerError::PeriodClosed {
            period: period_key_for(date),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2024, 3, 1), "2024-03")]
    #[case(date(2024, 12, 31), "2024-12")]
    #[case(date(2026, 1, 15), "2026-01")]
    fn test_period_key_for(#[case] input: NaiveDate, #[case] expected: &str) {
        assert_eq!(period_key_for(input), expected);
    }

    #[rstest]
    #[case(date(2024, 3, 15), date(2024, 3, 1), date(2024, 3, 31))]
    #[case(date(2024, 2, 10), date(2024, 2, 1), date(2024, 2, 29))]
    #[case(date(2023, 2, 10), date(2023, 2, 1), date(2023, 2, 28))]
    #[case(date(2024, 12, 25), date(2024, 12, 1), date(2024, 12, 31))]
    fn test_period_bounds(
        #[case] input: NaiveDate,
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
    ) {
        assert_eq!(period_bounds(input), (start, end));
    }

    #[test]
    fn test_contains_date() {
        let (start_date, end_date) = period_bounds(date(2024, 3, 10));
        let period = AccountingPeriod {
            id: PeriodId::new(),
            period_key: "2024-03".to_string(),
            start_date,
            end_date,
            status: PeriodStatus::Open,
            opened_at: None,
            closed_at: None,
        };
        assert!(period.contains_date(date(2024, 3, 1)));
        assert!(period.contains_date(date(2024, 3, 31)));
        assert!(!period.contains_date(date(2024, 4, 1)));
        assert!(!period.contains_date(date(2024, 2, 29)));
    }

    #[test]
    fn test_open_period_allows_posting() {
        let result = validate_posting_date(date(2024, 3, 1), Some(PeriodStatus::Open), true);
        assert!(result.is_ok());
    }

    #[test]
    fn test_closed_period_rejects_posting() {
        let result = validate_posting_date(date(2024, 3, 1), Some(PeriodStatus::Closed), true);
        assert!(matches!(
            result,
            Err(LedgerError::PeriodClosed { period }) if period == "2024-03"
        ));
    }

    #[test]
    fn test_unknown_period_open_by_default() {
        assert!(validate_posting_date(date(2024, 3, 1), None, true).is_ok());
    }

    #[test]
    fn test_unknown_period_rejected_under_strict_policy() {
        let result = validate_posting_date(date(2024, 3, 1), None, false);
        assert!(matches!(result, Err(LedgerError::PeriodClosed { .. })));
    }
}
