//! Pricing
//!
//! Quantity-based volume discounts: a fixed schedule of quantity thresholds,
//! each mapping to a percentage off the unit price. A line qualifies for the
//! steepest tier whose threshold its quantity meets; tiers never stack.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// A single tier in a quantity discount schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantityTier {
    threshold: u32,
    rate: Percentage,
}

impl QuantityTier {
    /// Create a tier giving `rate` off the unit price at `threshold` or more units.
    pub fn new(threshold: u32, rate: Percentage) -> Self {
        Self { threshold, rate }
    }

    /// Minimum quantity that qualifies for this tier.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Fractional discount rate (e.g. 0.05 for 5%).
    pub fn rate(&self) -> Percentage {
        self.rate
    }
}

/// An ordered quantity discount schedule.
#[derive(Debug, Clone)]
pub struct DiscountSchedule {
    tiers: Vec<QuantityTier>,
}

impl DiscountSchedule {
    /// Create a schedule from the given tiers, ordered by threshold ascending.
    pub fn new(mut tiers: Vec<QuantityTier>) -> Self {
        tiers.sort_by_key(QuantityTier::threshold);

        Self { tiers }
    }

    /// The standard schedule: 5% off at 5+, 10% off at 10+, 15% off at 20+.
    pub fn standard() -> Self {
        Self::new(vec![
            QuantityTier::new(5, Percentage::from(0.05)),
            QuantityTier::new(10, Percentage::from(0.10)),
            QuantityTier::new(20, Percentage::from(0.15)),
        ])
    }

    /// The tiers, ordered by threshold ascending.
    pub fn tiers(&self) -> &[QuantityTier] {
        &self.tiers
    }

    /// Calculate the per-unit discount for a line at the given quantity.
    ///
    /// The steepest tier whose threshold does not exceed `quantity` applies;
    /// quantities below the lowest threshold get no discount. The result is
    /// never negative and never exceeds the unit price.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::PercentConversion`] if the percentage
    /// calculation cannot be safely represented in minor units.
    pub fn unit_discount(
        &self,
        unit_price: Money<'static, Currency>,
        quantity: u32,
    ) -> Result<Money<'static, Currency>, PricingError> {
        let qualifying = self
            .tiers
            .iter()
            .rev()
            .find(|tier| quantity >= tier.threshold);

        let Some(tier) = qualifying else {
            return Ok(Money::from_minor(0, unit_price.currency()));
        };

        let unit_minor = unit_price.to_minor_units();
        let discount_minor = percent_of_minor(tier.rate, unit_minor)?;

        Ok(Money::from_minor(
            discount_minor.clamp(0, unit_minor),
            unit_price.currency(),
        ))
    }
}

impl Default for DiscountSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

/// Calculate a percentage of a minor unit amount, rounded half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the calculation overflows
/// or the result cannot be represented as an `i64`.
pub fn percent_of_minor(rate: Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor_dec = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion)?;

    let applied = rate * minor_dec;
    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    rounded.to_i64().ok_or(PricingError::PercentConversion)
}
