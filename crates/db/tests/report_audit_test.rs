//! Integration tests for the ledger reader and the reconciliation audit.
//!
//! Requires Docker (testcontainers); ignored by default.

mod support;

use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use corebook_core::audit::{AuditFinding, Severity};
use corebook_core::ledger::{LineInput, PostingRequest};
use corebook_db::entities::{invoices, journal_postings};
use corebook_db::repositories::{
    AuditRepository, JournalRepository, PeriodRepository, ReportFilter, ReportRepository,
};
use corebook_shared::types::PageRequest;

use support::{cash_sale_request, date, seed_accounts, seed_invoice, start};

fn rent_payment(day: u32, branch: &str) -> PostingRequest {
    PostingRequest {
        description: "office rent".to_string(),
        entry_date: date(2024, 3, day),
        branch: Some(branch.to_string()),
        reference: None,
        lines: vec![
            LineInput::debit("5100", dec!(40)),
            LineInput::credit("1111", dec!(40)),
        ],
    }
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_reports_over_posted_entries() {
    let db = start().await;
    seed_accounts(&db.conn).await;

    let journal = JournalRepository::new(db.conn.clone());
    let reports = ReportRepository::new(db.conn.clone());

    journal.post(cash_sale_request(None)).await.unwrap();
    journal.post(rent_payment(10, "main")).await.unwrap();
    // A draft that must stay invisible everywhere.
    journal.save_draft(rent_payment(11, "main")).await.unwrap();

    // Trial balance: 115 debit from the sale + 40 rent debit, mirrored.
    let tb = reports.trial_balance(ReportFilter::default()).await.unwrap();
    assert_eq!(tb.totals.total_debit, dec!(155));
    assert!(tb.totals.is_balanced);

    // Balance sheet balances through current earnings (100 - 40 = 60).
    let bs = reports.balance_sheet(None).await.unwrap();
    assert_eq!(bs.total_assets, dec!(75));
    assert_eq!(bs.current_earnings, dec!(60));
    assert!(bs.is_balanced);

    // Income statement over March.
    let is = reports
        .income_statement(ReportFilter {
            from: Some(date(2024, 3, 1)),
            to: Some(date(2024, 3, 31)),
            branch: None,
        })
        .await
        .unwrap();
    assert_eq!(is.revenue.total, dec!(100));
    assert_eq!(is.expenses.total, dec!(40));
    assert_eq!(is.net_income, dec!(60));
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_branch_filter_restricts_totals() {
    let db = start().await;
    seed_accounts(&db.conn).await;

    let journal = JournalRepository::new(db.conn.clone());
    let reports = ReportRepository::new(db.conn.clone());

    journal.post(rent_payment(5, "main")).await.unwrap();
    journal.post(rent_payment(6, "north")).await.unwrap();
    journal.post(rent_payment(7, "north")).await.unwrap();

    let north = reports
        .trial_balance(ReportFilter {
            from: None,
            to: None,
            branch: Some("north".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(north.totals.total_debit, dec!(80));
    assert!(north.totals.is_balanced);
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_account_ledger_running_balance_and_pagination() {
    let db = start().await;
    seed_accounts(&db.conn).await;

    let journal = JournalRepository::new(db.conn.clone());
    let reports = ReportRepository::new(db.conn.clone());

    journal.post(cash_sale_request(None)).await.unwrap();
    journal.post(rent_payment(10, "main")).await.unwrap();
    journal.post(rent_payment(20, "main")).await.unwrap();

    let page = reports
        .account_ledger("1111", ReportFilter::default(), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.meta.total, 3);
    let balances: Vec<_> = page.data.iter().map(|r| r.running_balance).collect();
    assert_eq!(balances, vec![dec!(115), dec!(75), dec!(35)]);

    // Page size 2: second page holds the last row.
    let page2 = reports
        .account_ledger(
            "1111",
            ReportFilter::default(),
            PageRequest { page: 2, per_page: 2 },
        )
        .await
        .unwrap();
    assert_eq!(page2.data.len(), 1);
    assert_eq!(page2.data[0].running_balance, dec!(35));
    assert_eq!(page2.meta.total_pages, 2);
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_audit_clean_ledger() {
    let db = start().await;
    seed_accounts(&db.conn).await;
    let reference = seed_invoice(&db.conn, "INV-A1", dec!(115)).await;

    let journal = JournalRepository::new(db.conn.clone());
    let periods = PeriodRepository::new(db.conn.clone());
    periods.open("2024-03").await.unwrap();

    journal.post(cash_sale_request(Some(reference))).await.unwrap();

    let audit = AuditRepository::new(db.conn.clone());
    let report = audit.run().await.unwrap();

    assert!(report.is_clean(), "findings: {:?}", report.findings);
    assert!(report.findings.is_empty());
    assert_eq!(report.entries_checked, 1);
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_audit_reports_seeded_violations() {
    let db = start().await;
    seed_accounts(&db.conn).await;
    let reference = seed_invoice(&db.conn, "INV-A2", dec!(115)).await;

    let journal = JournalRepository::new(db.conn.clone());
    // Period intentionally left unformalized: expect an UnknownPeriod
    // warning.
    let posted = journal
        .post(cash_sale_request(Some(reference)))
        .await
        .unwrap();

    // Break the balance invariant behind the writer's back: delete one
    // posting of the posted entry.
    let vat_line = journal_postings::Entity::find()
        .filter(journal_postings::Column::EntryId.eq(posted.id))
        .filter(journal_postings::Column::LineNo.eq(3i16))
        .one(&db.conn)
        .await
        .unwrap()
        .unwrap();
    journal_postings::Entity::delete_by_id(vat_line.id)
        .exec(&db.conn)
        .await
        .unwrap();

    // A posted invoice with no link at all: warning.
    seed_invoice(&db.conn, "INV-A3", dec!(50)).await;

    let audit = AuditRepository::new(db.conn.clone());
    let report = audit.run().await.unwrap();
    assert!(!report.is_clean());

    let codes: Vec<&str> = report.findings.iter().map(AuditFinding::code).collect();
    assert!(codes.contains(&"UNBALANCED_ENTRY"));
    assert!(codes.contains(&"GLOBAL_IMBALANCE"));
    assert!(codes.contains(&"UNKNOWN_PERIOD"));
    assert!(codes.contains(&"UNLINKED_DOCUMENT"));

    // Errors and warnings are separated correctly.
    assert!(!report.with_severity(Severity::Error).is_empty());
    assert!(!report.with_severity(Severity::Warning).is_empty());
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_audit_orphan_reference_after_document_deletion() {
    let db = start().await;
    seed_accounts(&db.conn).await;
    let reference = seed_invoice(&db.conn, "INV-GONE", dec!(115)).await;

    let journal = JournalRepository::new(db.conn.clone());
    journal.post(cash_sale_request(Some(reference))).await.unwrap();

    // The document module hard-deletes the invoice row; clear the FK first
    // the way a cascading cleanup would.
    let invoice = invoices::Entity::find_by_id(reference.id)
        .one(&db.conn)
        .await
        .unwrap()
        .unwrap();
    let mut active: invoices::ActiveModel = invoice.into();
    active.journal_entry_id = Set(None);
    active.update(&db.conn).await.unwrap();
    invoices::Entity::delete_by_id(reference.id)
        .exec(&db.conn)
        .await
        .unwrap();

    let audit = AuditRepository::new(db.conn.clone());
    let report = audit.run().await.unwrap();

    let codes: Vec<&str> = report.findings.iter().map(AuditFinding::code).collect();
    assert!(codes.contains(&"ORPHAN_REFERENCE"));
}
