//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary values are `rust_decimal::Decimal`; storage columns are
//! `NUMERIC(19, 4)`, so amounts are quantized to four decimal places with
//! Banker's Rounding before they are persisted or compared.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places used by monetary storage columns.
pub const MONEY_SCALE: u32 = 4;

/// Quantizes an amount to the monetary storage scale using Banker's Rounding.
#[must_use]
pub fn quantize(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if the amount is exactly zero.
#[must_use]
pub fn is_zero(amount: Decimal) -> bool {
    amount.is_zero()
}

/// Returns true if the amount is strictly negative.
#[must_use]
pub fn is_negative(amount: Decimal) -> bool {
    amount.is_sign_negative() && !amount.is_zero()
}
