//! `SeaORM` Entity for the journal_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntryStatus;

/// Journal entry header row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Monotonic entry number, allocated at posting time. NULL for drafts.
    pub entry_number: Option<i64>,
    /// Description of the business event.
    pub description: String,
    /// Accounting date.
    pub entry_date: Date,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// Kind of the owning document, when document-driven.
    pub reference_type: Option<String>,
    /// Id of the owning document row, when document-driven.
    pub reference_id: Option<i64>,
    /// Branch tag for branch-filtered reporting.
    pub branch: Option<String>,
    /// Set on a mirror entry: the entry it reverses.
    pub reverses_entry_id: Option<Uuid>,
    /// Set on a reversed entry: the mirror that cancelled it.
    pub reversed_by_entry_id: Option<Uuid>,
    /// When the entry was posted.
    pub posted_at: Option<DateTimeWithTimeZone>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Lines of this entry.
    #[sea_orm(has_many = "super::journal_postings::Entity")]
    JournalPostings,
}

impl Related<super::journal_postings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalPostings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
