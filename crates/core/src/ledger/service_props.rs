//! Property tests for posting validation and reversal construction.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use corebook_shared::types::AccountId;

use crate::ledger::error::LedgerError;
use crate::ledger::reversal::{build_mirror, OriginalEntry, OriginalLine};
use crate::ledger::service::{AccountRef, LedgerService};
use crate::ledger::types::{EntryStatus, LineInput, PostingRequest};
use crate::ledger::validation::validate_lines;

/// Strategy for positive amounts with two decimal places (cents).
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a balanced line set: N debit amounts mirrored by one credit
/// of the same total, plus optional extra credit splits.
fn balanced_lines_strategy() -> impl Strategy<Value = Vec<LineInput>> {
    prop::collection::vec(amount_strategy(), 1..6).prop_map(|debits| {
        let total: Decimal = debits.iter().copied().sum();
        let mut lines: Vec<LineInput> = debits
            .into_iter()
            .enumerate()
            .map(|(i, amount)| LineInput::debit(format!("11{i:02}"), amount))
            .collect();
        lines.push(LineInput::credit("4100", total));
        lines
    })
}

fn request(lines: Vec<LineInput>) -> PostingRequest {
    PostingRequest {
        description: "generated".to_string(),
        entry_date: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
        branch: None,
        reference: None,
        lines,
    }
}

fn ok_lookup(_code: &str) -> Result<AccountRef, LedgerError> {
    Ok(AccountRef {
        id: AccountId::new(),
        is_active: true,
        allow_manual_entry: true,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property: balanced entries always validate and resolve**
    ///
    /// *For any* balanced line set, validation succeeds and the resolved
    /// totals are balanced.
    #[test]
    fn prop_balanced_entries_resolve(lines in balanced_lines_strategy()) {
        let req = request(lines);
        let (resolved, totals) = LedgerService::validate_and_resolve(&req, ok_lookup)
            .expect("balanced entry must resolve");

        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.difference(), Decimal::ZERO);
        prop_assert_eq!(resolved.len(), req.lines.len());
    }

    /// **Property: mismatched sums are always rejected before resolution**
    ///
    /// *For any* balanced line set perturbed by a nonzero cent delta on the
    /// credit side, validation fails with `Unbalanced` and the account
    /// lookup never runs.
    #[test]
    fn prop_unbalanced_entries_rejected(
        lines in balanced_lines_strategy(),
        delta_cents in prop_oneof![-10_000i64..0, 1i64..10_000],
    ) {
        let mut lines = lines;
        let last = lines.last_mut().expect("generated lines are non-empty");
        let perturbed = last.credit + Decimal::new(delta_cents, 2);
        prop_assume!(perturbed > Decimal::ZERO);
        last.credit = perturbed;

        let req = request(lines);
        let lookup_must_not_run = |_code: &str| -> Result<AccountRef, LedgerError> {
            panic!("lookup must not run for an unbalanced request")
        };

        let result = LedgerService::validate_and_resolve(&req, lookup_must_not_run);
        let is_unbalanced = matches!(result, Err(LedgerError::Unbalanced { .. }));
        prop_assert!(is_unbalanced);
    }

    /// **Property: mirror entries cancel the original exactly**
    ///
    /// *For any* balanced posted entry, summing the signed amounts of the
    /// original and its mirror per account yields zero everywhere.
    #[test]
    fn prop_mirror_cancels_original(lines in balanced_lines_strategy()) {
        let original = OriginalEntry {
            id: Uuid::now_v7(),
            entry_number: Some(1),
            status: EntryStatus::Posted,
            description: "generated".to_string(),
            branch: None,
            reference: None,
            lines: lines
                .iter()
                .map(|l| OriginalLine {
                    account_code: l.account_code.clone(),
                    debit: l.debit,
                    credit: l.credit,
                })
                .collect(),
        };

        let mirror = build_mirror(
            &original,
            NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date"),
        );

        // The mirror is itself a valid balanced entry.
        prop_assert!(validate_lines(&mirror.lines).is_ok());

        // Per line: net effect (debit - credit) cancels exactly.
        for (orig, mirrored) in original.lines.iter().zip(mirror.lines.iter()) {
            prop_assert_eq!(&orig.account_code, &mirrored.account_code);
            let net = (orig.debit - orig.credit) + (mirrored.debit - mirrored.credit);
            prop_assert_eq!(net, Decimal::ZERO);
        }
    }

    /// **Property: validation totals equal the arithmetic sums**
    ///
    /// *For any* balanced line set, the reported totals match a direct sum
    /// over the lines.
    #[test]
    fn prop_totals_match_sums(lines in balanced_lines_strategy()) {
        let totals = validate_lines(&lines).expect("balanced entry validates");
        let debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = lines.iter().map(|l| l.credit).sum();
        prop_assert_eq!(totals.debit, debit);
        prop_assert_eq!(totals.credit, credit);
    }
}
