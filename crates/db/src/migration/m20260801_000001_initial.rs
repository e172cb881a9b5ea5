//! Initial database migration.
//!
//! Creates the ledger enums and tables, the entry-number sequence, the
//! document tables with their `journal_entry_id` link columns, and the
//! constraints backing the posting invariants.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: ACCOUNTING PERIODS
        // ============================================================
        db.execute_unprepared(ACCOUNTING_PERIODS_SQL).await?;

        // ============================================================
        // PART 4: JOURNAL ENTRIES & POSTINGS
        // ============================================================
        db.execute_unprepared(ENTRY_NUMBER_SEQUENCE_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_POSTINGS_SQL).await?;

        // ============================================================
        // PART 5: DOCUMENT TABLES
        // ============================================================
        db.execute_unprepared(DOCUMENT_TABLES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Account types
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

-- Which side increases an account's balance
CREATE TYPE account_nature AS ENUM ('debit', 'credit');

-- Journal entry status
CREATE TYPE entry_status AS ENUM ('draft', 'posted', 'reversed');

-- Accounting period status
CREATE TYPE period_status AS ENUM ('open', 'closed');
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    name_alt VARCHAR(255),
    account_type account_type NOT NULL,
    nature account_nature NOT NULL,
    parent_id UUID REFERENCES accounts(id),
    opening_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    allow_manual_entry BOOLEAN NOT NULL DEFAULT true,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_accounts_type ON accounts(account_type);
CREATE INDEX idx_accounts_parent ON accounts(parent_id) WHERE parent_id IS NOT NULL;
";

const ACCOUNTING_PERIODS_SQL: &str = r"
CREATE TABLE accounting_periods (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    period_key VARCHAR(7) NOT NULL UNIQUE,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status period_status NOT NULL DEFAULT 'open',
    opened_at TIMESTAMPTZ,
    closed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_period_dates CHECK (end_date >= start_date),
    CONSTRAINT chk_period_key_format CHECK (period_key ~ '^\d{4}-\d{2}$')
);

CREATE INDEX idx_periods_range ON accounting_periods(start_date, end_date);
";

const ENTRY_NUMBER_SEQUENCE_SQL: &str = r"
-- Entry numbers come from a store-native sequence allocated inside the
-- posting transaction. Uniqueness is guaranteed under concurrency; gaps
-- after rollbacks are acceptable.
CREATE SEQUENCE journal_entry_number_seq AS BIGINT START WITH 1;
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entry_number BIGINT,
    description TEXT NOT NULL,
    entry_date DATE NOT NULL,
    status entry_status NOT NULL DEFAULT 'draft',
    reference_type VARCHAR(50),
    reference_id BIGINT,
    branch VARCHAR(100),
    reverses_entry_id UUID REFERENCES journal_entries(id),
    reversed_by_entry_id UUID REFERENCES journal_entries(id),
    posted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_reference_both_or_neither CHECK (
        (reference_type IS NULL) = (reference_id IS NULL)
    ),
    CONSTRAINT chk_posted_entries_numbered CHECK (
        status = 'draft' OR entry_number IS NOT NULL
    )
);

CREATE UNIQUE INDEX uq_journal_entries_number
    ON journal_entries(entry_number)
    WHERE entry_number IS NOT NULL;

-- One non-mirror entry per document: the storage-level backstop for the
-- AlreadyLinked idempotency check. Reversal mirrors repeat the original's
-- reference and are exempt via reverses_entry_id.
CREATE UNIQUE INDEX uq_journal_entries_reference
    ON journal_entries(reference_type, reference_id)
    WHERE reference_id IS NOT NULL
      AND reverses_entry_id IS NULL
      AND status <> 'draft';

CREATE INDEX idx_entries_date ON journal_entries(entry_date);
CREATE INDEX idx_entries_status ON journal_entries(status);
CREATE INDEX idx_entries_branch ON journal_entries(branch) WHERE branch IS NOT NULL;
";

const JOURNAL_POSTINGS_SQL: &str = r"
CREATE TABLE journal_postings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    line_no SMALLINT NOT NULL,
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_debit_or_credit CHECK (
        (debit > 0 AND credit = 0) OR (debit = 0 AND credit > 0)
    ),
    CONSTRAINT chk_line_no_positive CHECK (line_no > 0),
    UNIQUE (entry_id, line_no)
);

CREATE INDEX idx_postings_entry ON journal_postings(entry_id);
CREATE INDEX idx_postings_account ON journal_postings(account_id);
";

const DOCUMENT_TABLES_SQL: &str = r"
CREATE TABLE invoices (
    id BIGSERIAL PRIMARY KEY,
    doc_number VARCHAR(50) NOT NULL UNIQUE,
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    total_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    journal_entry_id UUID REFERENCES journal_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE supplier_invoices (
    id BIGSERIAL PRIMARY KEY,
    doc_number VARCHAR(50) NOT NULL UNIQUE,
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    total_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    journal_entry_id UUID REFERENCES journal_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE expenses (
    id BIGSERIAL PRIMARY KEY,
    doc_number VARCHAR(50) NOT NULL UNIQUE,
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    total_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    journal_entry_id UUID REFERENCES journal_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE payroll_runs (
    id BIGSERIAL PRIMARY KEY,
    doc_number VARCHAR(50) NOT NULL UNIQUE,
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    total_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    journal_entry_id UUID REFERENCES journal_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_invoices_entry ON invoices(journal_entry_id) WHERE journal_entry_id IS NOT NULL;
CREATE INDEX idx_supplier_invoices_entry ON supplier_invoices(journal_entry_id) WHERE journal_entry_id IS NOT NULL;
CREATE INDEX idx_expenses_entry ON expenses(journal_entry_id) WHERE journal_entry_id IS NOT NULL;
CREATE INDEX idx_payroll_runs_entry ON payroll_runs(journal_entry_id) WHERE journal_entry_id IS NOT NULL;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS payroll_runs;
DROP TABLE IF EXISTS expenses;
DROP TABLE IF EXISTS supplier_invoices;
DROP TABLE IF EXISTS invoices;
DROP TABLE IF EXISTS journal_postings;
DROP TABLE IF EXISTS journal_entries;
DROP SEQUENCE IF EXISTS journal_entry_number_seq;
DROP TABLE IF EXISTS accounting_periods;
DROP TABLE IF EXISTS accounts;
DROP TYPE IF EXISTS period_status;
DROP TYPE IF EXISTS entry_status;
DROP TYPE IF EXISTS account_nature;
DROP TYPE IF EXISTS account_type;
";
