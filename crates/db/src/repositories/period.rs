//! Period repository - the gate deciding whether a date accepts postings.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use corebook_core::fiscal::{period_bounds, validate_posting_date, PeriodStatus as CoreStatus};
use corebook_core::ledger::LedgerError;

use crate::entities::{accounting_periods, sea_orm_active_enums::PeriodStatus};

/// Error types for period operations.
#[derive(Debug, thiserror::Error)]
pub enum PeriodError {
    /// Period key is not of the "YYYY-MM" form.
    #[error("Invalid period key '{0}', expected YYYY-MM")]
    InvalidKey(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Period repository gating ledger writes by date.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
    allow_unknown_periods: bool,
}

impl PeriodRepository {
    /// Creates a new period repository with the open-by-default policy.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            allow_unknown_periods: true,
        }
    }

    /// Overrides the unknown-period policy (see `ledger.allow_unknown_periods`).
    #[must_use]
    pub const fn with_unknown_period_policy(mut self, allow: bool) -> Self {
        self.allow_unknown_periods = allow;
        self
    }

    /// Finds the period containing the given date.
    ///
    /// # Errors
    ///
    /// Returns the underlying database error.
    pub async fn find_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<accounting_periods::Model>, DbErr> {
        accounting_periods::Entity::find()
            .filter(accounting_periods::Column::StartDate.lte(date))
            .filter(accounting_periods::Column::EndDate.gte(date))
            .one(&self.db)
            .await
    }

    /// Returns true if postings dated `date` are currently accepted.
    ///
    /// # Errors
    ///
    /// Returns the underlying database error.
    pub async fn is_open(&self, date: NaiveDate) -> Result<bool, DbErr> {
        let status = self.status_for_date(date).await?;
        Ok(validate_posting_date(date, status, self.allow_unknown_periods).is_ok())
    }

    /// Gates a posting date, propagating `PeriodClosed` on rejection.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::PeriodClosed` when the containing period is
    /// closed, or `LedgerError::Store` on infrastructure failure.
    pub async fn ensure_open(&self, date: NaiveDate) -> Result<(), LedgerError> {
        let status = self
            .status_for_date(date)
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))?;
        validate_posting_date(date, status, self.allow_unknown_periods)
    }

    async fn status_for_date(&self, date: NaiveDate) -> Result<Option<CoreStatus>, DbErr> {
        Ok(self
            .find_for_date(date)
            .await?
            .map(|period| period.status.into()))
    }

    /// Opens a period, creating the month row when missing. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidKey` for a malformed key, or the
    /// underlying database error.
    pub async fn open(&self, period_key: &str) -> Result<accounting_periods::Model, PeriodError> {
        self.transition(period_key, PeriodStatus::Open).await
    }

    /// Closes a period, creating the month row when missing. Idempotent.
    ///
    /// Closing never retroactively invalidates entries already posted into
    /// the period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidKey` for a malformed key, or the
    /// underlying database error.
    pub async fn close(&self, period_key: &str) -> Result<accounting_periods::Model, PeriodError> {
        self.transition(period_key, PeriodStatus::Closed).await
    }

    /// Lists all formalized periods, newest first.
    ///
    /// # Errors
    ///
    /// Returns the underlying database error.
    pub async fn list(&self) -> Result<Vec<accounting_periods::Model>, DbErr> {
        accounting_periods::Entity::find()
            .order_by_desc(accounting_periods::Column::PeriodKey)
            .all(&self.db)
            .await
    }

    async fn transition(
        &self,
        period_key: &str,
        target: PeriodStatus,
    ) -> Result<accounting_periods::Model, PeriodError> {
        let (start_date, end_date) = bounds_for_key(period_key)?;
        let now = Utc::now().into();

        let existing = accounting_periods::Entity::find()
            .filter(accounting_periods::Column::PeriodKey.eq(period_key))
            .one(&self.db)
            .await?;

        match existing {
            Some(period) if period.status == target => Ok(period),
            Some(period) => {
                let mut active: accounting_periods::ActiveModel = period.into();
                active.status = Set(target);
                match target {
                    PeriodStatus::Open => active.opened_at = Set(Some(now)),
                    PeriodStatus::Closed => active.closed_at = Set(Some(now)),
                }
                active.updated_at = Set(now);
                Ok(active.update(&self.db).await?)
            }
            None => {
                let (opened_at, closed_at) = match target {
                    PeriodStatus::Open => (Some(now), None),
                    PeriodStatus::Closed => (None, Some(now)),
                };
                let period = accounting_periods::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    period_key: Set(period_key.to_string()),
                    start_date: Set(start_date),
                    end_date: Set(end_date),
                    status: Set(target),
                    opened_at: Set(opened_at),
                    closed_at: Set(closed_at),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                Ok(period.insert(&self.db).await?)
            }
        }
    }
}

/// Parses "YYYY-MM" into the month's first and last day.
fn bounds_for_key(period_key: &str) -> Result<(NaiveDate, NaiveDate), PeriodError> {
    let invalid = || PeriodError::InvalidKey(period_key.to_string());

    let (year_part, month_part) = period_key.split_once('-').ok_or_else(invalid)?;
    if year_part.len() != 4 || month_part.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year_part.parse().map_err(|_| invalid())?;
    let month: u32 = month_part.parse().map_err(|_| invalid())?;

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    Ok(period_bounds(first))
}
