//! `SeaORM` Entity for the accounting_periods table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PeriodStatus;

/// Monthly accounting period row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounting_periods")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Period key in "YYYY-MM" form.
    #[sea_orm(unique)]
    pub period_key: String,
    /// First day of the month.
    pub start_date: Date,
    /// Last day of the month.
    pub end_date: Date,
    /// Current status.
    pub status: PeriodStatus,
    /// When the period was (last) opened.
    pub opened_at: Option<DateTimeWithTimeZone>,
    /// When the period was (last) closed.
    pub closed_at: Option<DateTimeWithTimeZone>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
