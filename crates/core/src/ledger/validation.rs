//! Business rule validation for posting requests.
//!
//! The zero-sum invariant is checked with exact `Decimal` equality and zero
//! tolerance. Monetary equality is exact; an epsilon would let one-cent
//! drifts through.

use rust_decimal::Decimal;

use corebook_shared::types::money::quantize;

use super::error::LedgerError;
use super::types::{EntryTotals, LineInput};

/// Validates the shape and balance of a set of posting lines.
///
/// Checks, in order:
/// 1. At least 2 lines.
/// 2. No negative amounts.
/// 3. Exactly one positive side per line (never both, never neither).
/// 4. Sum of debits equals sum of credits, exactly.
///
/// All amounts are quantized to the storage scale before comparison so the
/// invariant holds for what will actually be persisted.
///
/// # Errors
///
/// Returns the first violated rule as a `LedgerError`.
pub fn validate_lines(lines: &[LineInput]) -> Result<EntryTotals, LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::EmptyEntry);
    }

    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let debit = quantize(line.debit);
        let credit = quantize(line.credit);

        if debit < Decimal::ZERO || credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount { line_no });
        }

        let debit_set = debit > Decimal::ZERO;
        let credit_set = credit > Decimal::ZERO;
        if debit_set == credit_set {
            return Err(LedgerError::InvalidLine { line_no });
        }

        total_debit += debit;
        total_credit += credit;
    }

    let totals = EntryTotals::new(total_debit, total_credit);
    if !totals.is_balanced {
        return Err(LedgerError::Unbalanced {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(totals)
}
