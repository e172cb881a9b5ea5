//! `SeaORM` Entity for the payroll_runs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payroll run row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_runs")]
pub struct Model {
    /// Serial row id.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Run number assigned by the payroll module.
    pub doc_number: String,
    /// Document-module status ("draft", "posted", ...).
    pub status: String,
    /// Net payroll total.
    pub total_amount: Decimal,
    /// Link to the posted journal entry, at most one per document.
    pub journal_entry_id: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The linked journal entry.
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntries,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
