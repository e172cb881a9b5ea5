//! Ledger service for posting-request validation and resolution.
//!
//! Pure business logic with no database dependencies. The account lookup is
//! injected as a closure so the same rules run against any store (or a plain
//! map in tests).

use corebook_shared::types::money::quantize;
use corebook_shared::types::AccountId;

use super::error::LedgerError;
use super::types::{EntryStatus, EntryTotals, PostingRequest, ResolvedLine};
use super::validation::validate_lines;

/// Account facts needed to validate a posting line.
#[derive(Debug, Clone)]
pub struct AccountRef {
    /// The account id.
    pub id: AccountId,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether reference-less (manual) entries may target the account.
    pub allow_manual_entry: bool,
}

/// Stateless service validating and resolving posting requests.
pub struct LedgerService;

impl LedgerService {
    /// Validates a posting request and resolves its account codes.
    ///
    /// Steps, in the order the writer contract requires:
    /// 1. Line shape and exact balance (`validate_lines`) - rejected before
    ///    any lookup runs.
    /// 2. Every account code resolved through `account_lookup`; accounts
    ///    must be active, and for manual entries (no document reference)
    ///    must allow manual posting.
    ///
    /// Period gating and document linking are storage concerns handled by
    /// the repository inside the posting transaction.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` for the first violated rule.
    pub fn validate_and_resolve<A>(
        request: &PostingRequest,
        account_lookup: A,
    ) -> Result<(Vec<ResolvedLine>, EntryTotals), LedgerError>
    where
        A: Fn(&str) -> Result<AccountRef, LedgerError>,
    {
        let totals = validate_lines(&request.lines)?;

        let is_manual = request.reference.is_none();
        let mut resolved = Vec::with_capacity(request.lines.len());

        for (idx, line) in request.lines.iter().enumerate() {
            let account = account_lookup(&line.account_code)?;

            if !account.is_active {
                return Err(LedgerError::AccountInactive(line.account_code.clone()));
            }
            if is_manual && !account.allow_manual_entry {
                return Err(LedgerError::ManualEntryNotAllowed(
                    line.account_code.clone(),
                ));
            }

            resolved.push(ResolvedLine {
                account_id: account.id,
                account_code: line.account_code.clone(),
                line_no: i16::try_from(idx + 1).unwrap_or(i16::MAX),
                debit: quantize(line.debit),
                credit: quantize(line.credit),
            });
        }

        Ok((resolved, totals))
    }

    /// Validates that an entry can be modified or deleted.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotDraft` for posted or reversed entries.
    pub fn validate_can_edit(status: EntryStatus) -> Result<(), LedgerError> {
        if status.is_editable() {
            Ok(())
        } else {
            Err(LedgerError::NotDraft { status })
        }
    }

    /// Validates that an entry can be promoted from draft to posted.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotDraft` unless the entry is a draft.
    pub fn validate_can_post(status: EntryStatus) -> Result<(), LedgerError> {
        match status {
            EntryStatus::Draft => Ok(()),
            other => Err(LedgerError::NotDraft { status: other }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{DocumentKind, DocumentRef, LineInput};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ok_lookup(_code: &str) -> Result<AccountRef, LedgerError> {
        Ok(AccountRef {
            id: AccountId::new(),
            is_active: true,
            allow_manual_entry: true,
        })
    }

    fn request(reference: Option<DocumentRef>, lines: Vec<LineInput>) -> PostingRequest {
        PostingRequest {
            description: "cash sale".to_string(),
            entry_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            branch: None,
            reference,
            lines,
        }
    }

    #[test]
    fn test_resolves_balanced_request() {
        let req = request(
            None,
            vec![
                LineInput::debit("1111", dec!(115)),
                LineInput::credit("4111", dec!(100)),
                LineInput::credit("2141", dec!(15)),
            ],
        );

        let (resolved, totals) = LedgerService::validate_and_resolve(&req, ok_lookup).unwrap();
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].line_no, 1);
        assert_eq!(resolved[2].line_no, 3);
        assert_eq!(resolved[2].credit, dec!(15));
        assert!(totals.is_balanced);
        assert_eq!(totals.debit, dec!(115));
    }

    #[test]
    fn test_unbalanced_rejected_before_lookup() {
        let req = request(
            None,
            vec![
                LineInput::debit("1111", dec!(115)),
                LineInput::credit("4111", dec!(114)),
            ],
        );

        // A lookup that would fail the request if it ran.
        let poisoned = |_code: &str| -> Result<AccountRef, LedgerError> {
            panic!("lookup must not run for an unbalanced request")
        };

        assert!(matches!(
            LedgerService::validate_and_resolve(&req, poisoned),
            Err(LedgerError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_unknown_account_rejected() {
        let req = request(
            None,
            vec![
                LineInput::debit("1111", dec!(10)),
                LineInput::credit("9999", dec!(10)),
            ],
        );

        let lookup = |code: &str| -> Result<AccountRef, LedgerError> {
            if code == "9999" {
                Err(LedgerError::AccountNotFound(code.to_string()))
            } else {
                ok_lookup(code)
            }
        };

        assert!(matches!(
            LedgerService::validate_and_resolve(&req, lookup),
            Err(LedgerError::AccountNotFound(code)) if code == "9999"
        ));
    }

    #[test]
    fn test_inactive_account_rejected() {
        let req = request(
            None,
            vec![
                LineInput::debit("1111", dec!(10)),
                LineInput::credit("4111", dec!(10)),
            ],
        );

        let lookup = |_code: &str| -> Result<AccountRef, LedgerError> {
            Ok(AccountRef {
                id: AccountId::new(),
                is_active: false,
                allow_manual_entry: true,
            })
        };

        assert!(matches!(
            LedgerService::validate_and_resolve(&req, lookup),
            Err(LedgerError::AccountInactive(_))
        ));
    }

    #[test]
    fn test_manual_entry_policy_enforced_without_reference() {
        let lookup = |_code: &str| -> Result<AccountRef, LedgerError> {
            Ok(AccountRef {
                id: AccountId::new(),
                is_active: true,
                allow_manual_entry: false,
            })
        };

        let manual = request(
            None,
            vec![
                LineInput::debit("2141", dec!(10)),
                LineInput::credit("4111", dec!(10)),
            ],
        );
        assert!(matches!(
            LedgerService::validate_and_resolve(&manual, lookup),
            Err(LedgerError::ManualEntryNotAllowed(_))
        ));

        // The same accounts are fine when a document drives the posting.
        let documented = request(
            Some(DocumentRef {
                kind: DocumentKind::Invoice,
                id: 1,
            }),
            vec![
                LineInput::debit("2141", dec!(10)),
                LineInput::credit("4111", dec!(10)),
            ],
        );
        assert!(LedgerService::validate_and_resolve(&documented, lookup).is_ok());
    }

    #[test]
    fn test_can_edit_only_drafts() {
        assert!(LedgerService::validate_can_edit(EntryStatus::Draft).is_ok());
        assert!(matches!(
            LedgerService::validate_can_edit(EntryStatus::Posted),
            Err(LedgerError::NotDraft {
                status: EntryStatus::Posted
            })
        ));
        assert!(matches!(
            LedgerService::validate_can_edit(EntryStatus::Reversed),
            Err(LedgerError::NotDraft {
                status: EntryStatus::Reversed
            })
        ));
    }

    #[test]
    fn test_can_post_only_drafts() {
        assert!(LedgerService::validate_can_post(EntryStatus::Draft).is_ok());
        assert!(LedgerService::validate_can_post(EntryStatus::Posted).is_err());
    }
}
