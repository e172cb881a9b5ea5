//! Account domain types and balance rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use corebook_shared::types::AccountId;

/// Account classification in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, receivables, inventory).
    Asset,
    /// Obligations owed (payables, VAT due, loans).
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned from operations.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Returns the side that increases balances of this account type.
    ///
    /// Asset/Expense accounts grow with debits; Liability/Equity/Revenue
    /// accounts grow with credits. Contra accounts override this default.
    #[must_use]
    pub const fn default_nature(self) -> AccountNature {
        match self {
            Self::Asset | Self::Expense => AccountNature::Debit,
            Self::Liability | Self::Equity | Self::Revenue => AccountNature::Credit,
        }
    }

    /// Returns true for balance-sheet account types.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Returns true for income-statement account types.
    #[must_use]
    pub const fn is_income_statement(self) -> bool {
        matches!(self, Self::Revenue | Self::Expense)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        };
        write!(f, "{s}")
    }
}

/// Which side (debit or credit) increases an account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountNature {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

impl AccountNature {
    /// Calculates the signed balance change produced by one posting line.
    ///
    /// Debit-nature: change = debit - credit.
    /// Credit-nature: change = credit - debit.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// A node in the chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Unique account code (e.g. "4111").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Secondary localized display name, when maintained.
    pub name_alt: Option<String>,
    /// Account classification.
    pub account_type: AccountType,
    /// Side that increases the balance.
    pub nature: AccountNature,
    /// Parent account for tree ordering. Owns ordering only, not lifecycle.
    pub parent_id: Option<AccountId>,
    /// Balance carried in from before the ledger went live.
    pub opening_balance: Decimal,
    /// Whether reference-less (manual) journal entries may target this account.
    pub allow_manual_entry: bool,
    /// Whether the account is active.
    pub is_active: bool,
}

impl Account {
    /// Returns true when the nature deviates from the type's default
    /// (a contra account, e.g. accumulated depreciation).
    #[must_use]
    pub fn is_contra(&self) -> bool {
        self.nature != self.account_type.default_nature()
    }
}
