//! Accounting periods and posting-date gating.

pub mod period;

pub use period::{
    period_bounds, period_key_for, validate_posting_date, AccountingPeriod, PeriodStatus,
};
