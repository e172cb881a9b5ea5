//! `SeaORM` entity definitions.

pub mod accounting_periods;
pub mod accounts;
pub mod expenses;
pub mod invoices;
pub mod journal_entries;
pub mod journal_postings;
pub mod payroll_runs;
pub mod sea_orm_active_enums;
pub mod supplier_invoices;
