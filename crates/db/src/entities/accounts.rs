//! `SeaORM` Entity for the accounts table (chart of accounts).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AccountNature, AccountType};

/// Chart of accounts row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Unique account code (e.g. "4111").
    #[sea_orm(unique)]
    pub code: String,
    /// Display name.
    pub name: String,
    /// Secondary localized display name.
    pub name_alt: Option<String>,
    /// Account classification.
    pub account_type: AccountType,
    /// Side that increases the balance.
    pub nature: AccountNature,
    /// Parent account for tree ordering.
    pub parent_id: Option<Uuid>,
    /// Balance carried in from before the ledger went live.
    pub opening_balance: Decimal,
    /// Whether reference-less journal entries may target this account.
    pub allow_manual_entry: bool,
    /// Whether the account is active.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Postings targeting this account.
    #[sea_orm(has_many = "super::journal_postings::Entity")]
    JournalPostings,
}

impl Related<super::journal_postings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalPostings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
