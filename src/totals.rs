//! Totals
//!
//! Derived, read-only aggregates over a [`CartLedger`]. Nothing here is
//! cached: every call computes fresh from the current ledger state, so the
//! results can never drift from the lines.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::ledger::{CartLedger, LineItem};

/// Errors that can occur while aggregating cart totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalsError {
    /// A line's extended amount overflowed minor units.
    #[error("line amount overflowed minor units")]
    AmountOverflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Gross subtotal: unit price times quantity, summed over all lines. No
/// discounts are applied. An empty cart totals zero.
///
/// # Errors
///
/// Returns a [`TotalsError`] if money arithmetic fails or a line overflows.
pub fn subtotal(ledger: &CartLedger) -> Result<Money<'static, Currency>, TotalsError> {
    ledger.lines().iter().try_fold(
        Money::from_minor(0, ledger.currency()),
        |acc, line| Ok(acc.add(extended_price(line)?)?),
    )
}

/// Total number of units across all lines.
pub fn item_count(ledger: &CartLedger) -> u32 {
    ledger.lines().iter().map(LineItem::quantity).sum()
}

/// Sum of per-unit quantity discounts times quantity over all lines.
///
/// # Errors
///
/// Returns a [`TotalsError`] if money arithmetic fails or a line overflows.
pub fn item_discount_total(ledger: &CartLedger) -> Result<Money<'static, Currency>, TotalsError> {
    ledger.lines().iter().try_fold(
        Money::from_minor(0, ledger.currency()),
        |acc, line| Ok(acc.add(extended_discount(line)?)?),
    )
}

/// Amount due: subtotal minus item-level discounts minus the promo discount,
/// floored at zero. A fixed promo discount larger than the remaining subtotal
/// never produces a negative total.
///
/// # Errors
///
/// Returns a [`TotalsError`] if money arithmetic fails or a line overflows.
pub fn total_due(ledger: &CartLedger) -> Result<Money<'static, Currency>, TotalsError> {
    let gross = subtotal(ledger)?.to_minor_units();
    let item_discounts = item_discount_total(ledger)?.to_minor_units();
    let promo = ledger.promo_discount().to_minor_units();

    let due = gross
        .saturating_sub(item_discounts)
        .saturating_sub(promo);

    Ok(Money::from_minor(due.max(0), ledger.currency()))
}

/// A line's price extended over its quantity.
fn extended_price(line: &LineItem) -> Result<Money<'static, Currency>, TotalsError> {
    extend(line.service().price, line.quantity())
}

/// A line's per-unit discount extended over its quantity.
fn extended_discount(line: &LineItem) -> Result<Money<'static, Currency>, TotalsError> {
    extend(line.unit_discount(), line.quantity())
}

fn extend(amount: Money<'static, Currency>, quantity: u32) -> Result<Money<'static, Currency>, TotalsError> {
    let minor = amount
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(TotalsError::AmountOverflow)?;

    Ok(Money::from_minor(minor, amount.currency()))
}
