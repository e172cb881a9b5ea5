//! `SeaORM` Entity for the supplier_invoices table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supplier (purchase) invoice row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supplier_invoices")]
pub struct Model {
    /// Serial row id.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Document number assigned by the purchasing module.
    pub doc_number: String,
    /// Document-module status ("draft", "posted", ...).
    pub status: String,
    /// Invoice grand total.
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
