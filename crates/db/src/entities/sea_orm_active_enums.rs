//! Database enum types mapped to PostgreSQL enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account classification (`account_type` enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Obligations owed.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Owner's residual interest.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Income earned.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Costs incurred.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Which side increases an account's balance (`account_nature` enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_nature")]
#[serde(rename_all = "lowercase")]
pub enum AccountNature {
    /// Debits increase the balance.
    #[sea_orm(string_value = "debit")]
    Debit,
    /// Credits increase the balance.
    #[sea_orm(string_value = "credit")]
    Credit,
}

/// Journal entry lifecycle status (`entry_status` enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Entry has been posted (immutable).
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Entry has been cancelled by a posted mirror (immutable).
    #[sea_orm(string_value = "reversed")]
    Reversed,
}

/// Accounting period status (`period_status` enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "period_status")]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Period accepts postings.
    #[sea_orm(string_value = "open")]
    Open,
    /// Period rejects postings.
    #[sea_orm(string_value = "closed")]
    Closed,
}

// Conversions between database enums and their core domain twins. The core
// crate has no SeaORM dependency, so the mapping lives on this side.

impl From<AccountType> for corebook_core::accounts::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<corebook_core::accounts::AccountType> for AccountType {
    fn from(value: corebook_core::accounts::AccountType) -> Self {
        use corebook_core::accounts::AccountType as Core;
        match value {
            Core::Asset => Self::Asset,
            Core::Liability => Self::Liability,
            Core::Equity => Self::Equity,
            Core::Revenue => Self::Revenue,
            Core::Expense => Self::Expense,
        }
    }
}

impl From<AccountNature> for corebook_core::accounts::AccountNature {
    fn from(value: AccountNature) -> Self {
        match value {
            AccountNature::Debit => Self::Debit,
            AccountNature::Credit => Self::Credit,
        }
    }
}

impl From<corebook_core::accounts::AccountNature> for AccountNature {
    fn from(value: corebook_core::accounts::AccountNature) -> Self {
        use corebook_core::accounts::AccountNature as Core;
        match value {
            Core::Debit => Self::Debit,
            Core::Credit => Self::Credit,
        }
    }
}

impl From<EntryStatus> for corebook_core::ledger::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Reversed => Self::Reversed,
        }
    }
}

impl From<corebook_core::ledger::EntryStatus> for EntryStatus {
    fn from(value: corebook_core::ledger::EntryStatus) -> Self {
        use corebook_core::ledger::EntryStatus as Core;
        match value {
            Core::Draft => Self::Draft,
            Core::Posted => Self::Posted,
            Core::Reversed => Self::Reversed,
        }
    }
}

impl From<PeriodStatus> for corebook_core::fiscal::PeriodStatus {
    fn from(value: PeriodStatus) -> Self {
        match value {
            PeriodStatus::Open => Self::Open,
            PeriodStatus::Closed => Self::Closed,
        }
    }
}

impl From<corebook_core::fiscal::PeriodStatus> for PeriodStatus {
    fn from(value: corebook_core::fiscal::PeriodStatus) -> Self {
        use corebook_core::fiscal::PeriodStatus as Core;
        match value {
            Core::Open => Self::Open,
            Core::Closed => Self::Closed,
        }
    }
}
