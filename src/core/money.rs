//! Monetary primitives shared by every calculation.
//!
//! Amounts are whole units of the smallest currency denomination (`i64`);
//! XOF has no minor unit, so one unit is one franc. Rates are `Decimal`
//! fractions in `[0, 1]`.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{AppError, Result};

/// Amount in the smallest currency unit
pub type Amount = i64;

/// Round half-up to the nearest whole unit.
///
/// `MidpointAwayFromZero` is half-up for the non-negative amounts the engine
/// computes and stays symmetric for reversal (negated) amounts.
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// `round(amount × rate)` as a whole amount
pub fn apply_rate(amount: Amount, rate: Decimal) -> Result<Amount> {
    let product = Decimal::from(amount)
        .checked_mul(rate)
        .ok_or_else(|| AppError::invalid_amount(format!("{} × {} overflows", amount, rate)))?;

    round_half_up(product)
        .to_i64()
        .ok_or_else(|| AppError::invalid_amount(format!("{} × {} is out of range", amount, rate)))
}

/// `a + b`, failing instead of wrapping on overflow
pub fn checked_sum(a: Amount, b: Amount) -> Result<Amount> {
    a.checked_add(b)
        .ok_or_else(|| AppError::invalid_amount(format!("{} + {} overflows", a, b)))
}

/// Amounts fed to a calculation must be non-negative
pub fn validate_amount(amount: Amount) -> Result<()> {
    if amount < 0 {
        return Err(AppError::invalid_amount(format!(
            "amount cannot be negative, got {}",
            amount
        )));
    }
    Ok(())
}

/// Rates must lie in `[0, 1]`
pub fn validate_rate(name: &str, rate: Decimal) -> Result<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(AppError::invalid_rate(format!(
            "{} must be between 0 and 1, got {}",
            name, rate
        )));
    }
    Ok(())
}

/// Convert a floating-point amount read from a schemaless document.
///
/// Rejects NaN, infinities and negatives; fractional francs are rounded
/// half-up.
pub fn amount_from_f64(value: f64) -> Result<Amount> {
    if !value.is_finite() {
        return Err(AppError::invalid_amount(format!(
            "amount must be finite, got {}",
            value
        )));
    }
    if value < 0.0 {
        return Err(AppError::invalid_amount(format!(
            "amount cannot be negative, got {}",
            value
        )));
    }

    Decimal::from_f64(value)
        .map(round_half_up)
        .and_then(|d| d.to_i64())
        .ok_or_else(|| AppError::invalid_amount(format!("amount {} is out of range", value)))
}
