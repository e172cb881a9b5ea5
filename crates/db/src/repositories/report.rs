//! Report repository - the ledger reader.
//!
//! Every aggregate here consumes `posted` journal entries only. Draft and
//! reversed entries never contribute, and document status fields are never
//! consulted for amounts - posted journal entries are the single source of
//! truth.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use corebook_core::reports::{
    AccountLedgerRow, AccountTotals, BalanceSheetReport, IncomeStatementReport, ReportService,
    TrialBalanceReport,
};
use corebook_shared::types::{PageRequest, PageResponse};

use crate::entities::{
    accounts, journal_entries, journal_postings, sea_orm_active_enums::EntryStatus,
};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter for read queries.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Start of the date range.
    pub from: Option<NaiveDate>,
    /// End of the date range.
    pub to: Option<NaiveDate>,
    /// Branch restriction.
    pub branch: Option<String>,
}

impl ReportFilter {
    fn validate(&self) -> Result<(), ReportError> {
        if let (Some(start), Some(end)) = (self.from, self.to) {
            if start > end {
                return Err(ReportError::InvalidDateRange { start, end });
            }
        }
        Ok(())
    }
}

/// Report repository computing derived views over posted entries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes an account's balance as of a date.
    ///
    /// `opening_balance + debits - credits` for debit-nature accounts,
    /// mirrored for credit-nature; posted entries only.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::AccountNotFound` for an unknown code.
    pub async fn account_balance(
        &self,
        account_code: &str,
        as_of: Option<NaiveDate>,
    ) -> Result<Decimal, ReportError> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(account_code))
            .one(&self.db)
            .await?
            .ok_or_else(|| ReportError::AccountNotFound(account_code.to_string()))?;

        let filter = ReportFilter {
            from: None,
            to: as_of,
            branch: None,
        };
        let totals = self.account_totals(&filter).await?;
        let (total_debit, total_credit) = totals.get(&account.id).copied().unwrap_or_default();

        let nature: corebook_core::accounts::AccountNature = account.nature.into();
        Ok(account.opening_balance + nature.balance_change(total_debit, total_credit))
    }

    /// Generates the trial balance over posted entries in range.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` for an inverted range.
    pub async fn trial_balance(
        &self,
        filter: ReportFilter,
    ) -> Result<TrialBalanceReport, ReportError> {
        filter.validate()?;
        let rows = self.load_account_totals(&filter).await?;
        Ok(ReportService::trial_balance(rows, filter.from, filter.to))
    }

    /// Generates the balance sheet as of a date.
    ///
    /// # Errors
    ///
    /// Returns the underlying database error.
    pub async fn balance_sheet(
        &self,
        as_of: Option<NaiveDate>,
    ) -> Result<BalanceSheetReport, ReportError> {
        let filter = ReportFilter {
            from: None,
            to: as_of,
            branch: None,
        };
        let rows = self.load_account_totals(&filter).await?;
        Ok(ReportService::balance_sheet(rows, as_of))
    }

    /// Generates the income statement over a date range.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` for an inverted range.
    pub async fn income_statement(
        &self,
        filter: ReportFilter,
    ) -> Result<IncomeStatementReport, ReportError> {
        filter.validate()?;
        let rows = self.load_account_totals(&filter).await?;
        Ok(ReportService::income_statement(rows, filter.from, filter.to))
    }

    /// Lists an account's posted history with running balances, paginated.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::AccountNotFound` for an unknown code.
    pub async fn account_ledger(
        &self,
        account_code: &str,
        filter: ReportFilter,
        page: PageRequest,
    ) -> Result<PageResponse<AccountLedgerRow>, ReportError> {
        filter.validate()?;

        let account = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(account_code))
            .one(&self.db)
            .await?
            .ok_or_else(|| ReportError::AccountNotFound(account_code.to_string()))?;

        let entries = self.posted_entries(&filter).await?;
        let entry_by_id: HashMap<Uuid, &journal_entries::Model> =
            entries.iter().map(|e| (e.id, e)).collect();
        let entry_ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();

        let mut postings = journal_postings::Entity::find()
            .filter(journal_postings::Column::AccountId.eq(account.id))
            .filter(journal_postings::Column::EntryId.is_in(entry_ids))
            .all(&self.db)
            .await?;

        // Chronological order: by entry date, then entry number.
        postings.sort_by_key(|p| {
            let entry = entry_by_id.get(&p.entry_id);
            (
                entry.map(|e| e.entry_date),
                entry.and_then(|e| e.entry_number),
                p.line_no,
            )
        });

        let nature: corebook_core::accounts::AccountNature = account.nature.into();
        let amounts: Vec<(Decimal, Decimal)> =
            postings.iter().map(|p| (p.debit, p.credit)).collect();
        let balances = ReportService::running_balances(nature, account.opening_balance, &amounts);

        let rows: Vec<AccountLedgerRow> = postings
            .iter()
            .zip(balances)
            .map(|(posting, running_balance)| {
                let entry = entry_by_id.get(&posting.entry_id);
                AccountLedgerRow {
                    entry_id: posting.entry_id,
                    entry_number: entry.and_then(|e| e.entry_number),
                    entry_date: entry.map(|e| e.entry_date).unwrap_or_default(),
                    description: entry.map(|e| e.description.clone()).unwrap_or_default(),
                    debit: posting.debit,
                    credit: posting.credit,
                    running_balance,
                }
            })
            .collect();

        let total = rows.len() as u64;
        let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let paged: Vec<AccountLedgerRow> = rows
            .into_iter()
            .skip(start)
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .collect();

        Ok(PageResponse::new(paged, page.page, page.per_page, total))
    }

    /// Loads posted entries matching the filter.
    async fn posted_entries(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<journal_entries::Model>, DbErr> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::Status.eq(EntryStatus::Posted));

        if let Some(from) = filter.from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }
        if let Some(branch) = &filter.branch {
            query = query.filter(journal_entries::Column::Branch.eq(branch.clone()));
        }

        query
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::EntryNumber)
            .all(&self.db)
            .await
    }

    /// Folds postings of the filtered posted entries into per-account
    /// (debit, credit) totals.
    async fn account_totals(
        &self,
        filter: &ReportFilter,
    ) -> Result<HashMap<Uuid, (Decimal, Decimal)>, DbErr> {
        let entry_ids: Vec<Uuid> = self
            .posted_entries(filter)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();

        let mut totals: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        if entry_ids.is_empty() {
            return Ok(totals);
        }

        let postings = journal_postings::Entity::find()
            .filter(journal_postings::Column::EntryId.is_in(entry_ids))
            .all(&self.db)
            .await?;

        for posting in postings {
            let slot = totals.entry(posting.account_id).or_default();
            slot.0 += posting.debit;
            slot.1 += posting.credit;
        }

        Ok(totals)
    }

    /// Builds the per-account totals rows handed to the core report
    /// assembly.
    async fn load_account_totals(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<AccountTotals>, DbErr> {
        let totals = self.account_totals(filter).await?;

        let account_rows = accounts::Entity::find()
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;

        Ok(account_rows
            .into_iter()
            .map(|account| {
                let (total_debit, total_credit) =
                    totals.get(&account.id).copied().unwrap_or_default();
                AccountTotals {
                    account_id: account.id,
                    code: account.code,
                    name: account.name,
                    account_type: account.account_type.into(),
                    nature: account.nature.into(),
                    opening_balance: account.opening_balance,
                    total_debit,
                    total_credit,
                }
            })
            .collect())
    }
}
