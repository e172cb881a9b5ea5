//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::accounts::account::{AccountNature, AccountType};

/// Per-account totals over posted entries, the input to report assembly.
#[derive(Debug, Clone)]
pub struct AccountTotals {
    /// Account id.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Which side increases the balance.
    pub nature: AccountNature,
    /// Opening balance carried in from before the ledger went live.
    pub opening_balance: Decimal,
    /// Sum of posted debits in range.
    pub total_debit: Decimal,
    /// Sum of posted credits in range.
    pub total_credit: Decimal,
}

/// One row of the trial balance, keyed by account code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Debit-side total over posted entries in range.
    pub total_debit: Decimal,
    /// Credit-side total over posted entries in range.
    pub total_credit: Decimal,
}

/// Trial balance totals - the primary correctness oracle for the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total debit across all accounts.
    pub total_debit: Decimal,
    /// Total credit across all accounts.
    pub total_credit: Decimal,
    /// Whether debits equal credits to the cent.
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Start of the reported range, when bounded.
    pub from: Option<NaiveDate>,
    /// End of the reported range, when bounded.
    pub to: Option<NaiveDate>,
    /// One row per account, ordered by code.
    pub rows: Vec<TrialBalanceRow>,
    /// Global totals.
    pub totals: TrialBalanceTotals,
}

/// One account row inside a report section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRow {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Balance with the section's sign convention applied.
    pub balance: Decimal,
}

/// A titled group of accounts with a total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section, ordered by code.
    pub rows: Vec<SectionRow>,
}

impl ReportSection {
    /// Adds a row and folds its balance into the total.
    pub fn push(&mut self, row: SectionRow) {
        self.total += row.balance;
        self.rows.push(row);
    }
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// As-of date, when bounded.
    pub as_of: Option<NaiveDate>,
    /// Assets section.
    pub assets: ReportSection,
    /// Liabilities section.
    pub liabilities: ReportSection,
    /// Equity section (excluding current earnings).
    pub equity: ReportSection,
    /// Net income to date, folded into the equity side.
    pub current_earnings: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities plus equity plus current earnings.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity.
    pub is_balanced: bool,
}

/// Income statement report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Start of the reported range, when bounded.
    pub from: Option<NaiveDate>,
    /// End of the reported range, when bounded.
    pub to: Option<NaiveDate>,
    /// Revenue section.
    pub revenue: ReportSection,
    /// Expenses section.
    pub expenses: ReportSection,
    /// Revenue minus expenses.
    pub net_income: Decimal,
}

/// One row of a per-account ledger listing with a running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLedgerRow {
    /// Entry id.
    pub entry_id: Uuid,
    /// Entry number.
    pub entry_number: Option<i64>,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Debit amount on this account.
    pub debit: Decimal,
    /// Credit amount on this account.
    pub credit: Decimal,
    /// Balance after this row, per the account's nature.
    pub running_balance: Decimal,
}
