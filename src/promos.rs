//! Promo codes
//!
//! A fixed table of promotional codes and their cart-level discounts.
//! Evaluation is pure: the same code and subtotal always produce the same
//! result, and nothing here mutates cart state.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso, iso::Currency};

use crate::pricing::{PricingError, percent_of_minor};

/// The discount a promo code grants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromoBenefit {
    /// A percentage off the cart subtotal.
    PercentOff(Percentage),

    /// A fixed amount off the cart total.
    ///
    /// Not clamped against the subtotal here; the totals calculation floors
    /// the final amount at zero.
    AmountOff(Money<'static, Currency>),
}

impl PromoBenefit {
    /// Human-readable description of the granted discount.
    fn describe(&self) -> String {
        match self {
            PromoBenefit::PercentOff(rate) => {
                format!("{}% discount applied", percent_points(*rate))
            }
            PromoBenefit::AmountOff(amount) => format!("{amount} discount applied"),
        }
    }
}

/// A single promo code rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromoRule {
    benefit: PromoBenefit,
    minimum: Option<Money<'static, Currency>>,
}

impl PromoRule {
    /// A rule granting a percentage off the subtotal.
    pub fn percent_off(rate: Percentage) -> Self {
        Self {
            benefit: PromoBenefit::PercentOff(rate),
            minimum: None,
        }
    }

    /// A rule granting a fixed amount off the total.
    pub fn amount_off(amount: Money<'static, Currency>) -> Self {
        Self {
            benefit: PromoBenefit::AmountOff(amount),
            minimum: None,
        }
    }

    /// Require a minimum subtotal before the rule applies.
    pub fn with_minimum(mut self, minimum: Money<'static, Currency>) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// The granted discount.
    pub fn benefit(&self) -> &PromoBenefit {
        &self.benefit
    }

    /// The minimum qualifying subtotal, if any.
    pub fn minimum(&self) -> Option<&Money<'static, Currency>> {
        self.minimum.as_ref()
    }
}

/// Result of evaluating a promo code against a subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoEvaluation {
    /// Whether the code applies.
    pub valid: bool,

    /// Discount amount; zero when invalid.
    pub discount: Money<'static, Currency>,

    /// User-facing description of the outcome.
    pub message: String,
}

impl PromoEvaluation {
    fn invalid(currency: &'static Currency, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            discount: Money::from_minor(0, currency),
            message: message.into(),
        }
    }

    fn applied(discount: Money<'static, Currency>, message: String) -> Self {
        Self {
            valid: true,
            discount,
            message,
        }
    }
}

/// The promo code table, keyed by uppercased code.
#[derive(Debug, Clone)]
pub struct PromoTable {
    codes: FxHashMap<String, PromoRule>,
}

impl PromoTable {
    /// Create a table from code/rule pairs. Codes are uppercased on the way in.
    pub fn new<S: Into<String>>(codes: impl IntoIterator<Item = (S, PromoRule)>) -> Self {
        let codes = codes
            .into_iter()
            .map(|(code, rule)| (code.into().to_uppercase(), rule))
            .collect();

        Self { codes }
    }

    /// The standard storefront table.
    pub fn standard() -> Self {
        Self::new([
            ("WELCOME10", PromoRule::percent_off(Percentage::from(0.10))),
            (
                "SAVE20",
                PromoRule::percent_off(Percentage::from(0.20))
                    .with_minimum(Money::from_minor(100_00, iso::USD)),
            ),
            (
                "FLAT25",
                PromoRule::amount_off(Money::from_minor(25_00, iso::USD))
                    .with_minimum(Money::from_minor(150_00, iso::USD)),
            ),
            ("SPECIAL15", PromoRule::percent_off(Percentage::from(0.15))),
        ])
    }

    /// Look up a rule by code, case-insensitively.
    pub fn rule(&self, code: &str) -> Option<&PromoRule> {
        self.codes.get(&code.trim().to_uppercase())
    }

    /// Evaluate a code against the cart's gross subtotal.
    ///
    /// Lookup is case-insensitive. Unknown codes and unmet minimums come back
    /// as invalid evaluations with a zero discount, never as errors.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] only if the percentage arithmetic itself
    /// cannot be represented, which no table entry should trigger.
    pub fn evaluate(
        &self,
        code: &str,
        subtotal: Money<'static, Currency>,
    ) -> Result<PromoEvaluation, PricingError> {
        let Some(rule) = self.rule(code) else {
            return Ok(PromoEvaluation::invalid(
                subtotal.currency(),
                "Invalid promo code",
            ));
        };

        if let Some(minimum) = rule.minimum {
            if subtotal.to_minor_units() < minimum.to_minor_units() {
                return Ok(PromoEvaluation::invalid(
                    subtotal.currency(),
                    format!("Requires minimum purchase of {minimum}"),
                ));
            }
        }

        let discount = match rule.benefit {
            PromoBenefit::PercentOff(rate) => {
                let minor = percent_of_minor(rate, subtotal.to_minor_units())?;
                Money::from_minor(minor, subtotal.currency())
            }
            PromoBenefit::AmountOff(amount) => amount,
        };

        Ok(PromoEvaluation::applied(discount, rule.benefit.describe()))
    }
}

impl Default for PromoTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Convert a fractional rate to percent points for display (0.2 -> 20).
fn percent_points(rate: Percentage) -> Decimal {
    ((rate * Decimal::ONE) * Decimal::ONE_HUNDRED).normalize()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn unknown_code_is_invalid() -> TestResult {
        let table = PromoTable::standard();

        let result = table.evaluate("NOPE", Money::from_minor(500_00, USD))?;

        assert!(!result.valid);
        assert_eq!(result.discount, Money::from_minor(0, USD));
        assert_eq!(result.message, "Invalid promo code");

        Ok(())
    }

    #[test]
    fn lookup_is_case_insensitive() -> TestResult {
        let table = PromoTable::standard();

        let result = table.evaluate("save20", Money::from_minor(500_00, USD))?;

        assert!(result.valid);
        assert_eq!(result.discount, Money::from_minor(100_00, USD));

        Ok(())
    }

    #[test]
    fn percentage_code_discounts_proportionally() -> TestResult {
        let table = PromoTable::standard();

        let result = table.evaluate("WELCOME10", Money::from_minor(250_00, USD))?;

        assert!(result.valid);
        assert_eq!(result.discount, Money::from_minor(25_00, USD));
        assert_eq!(result.message, "10% discount applied");

        Ok(())
    }

    #[test]
    fn fixed_code_grants_flat_amount() -> TestResult {
        let table = PromoTable::standard();

        let result = table.evaluate("FLAT25", Money::from_minor(200_00, USD))?;

        assert!(result.valid);
        assert_eq!(result.discount, Money::from_minor(25_00, USD));
        assert_eq!(result.message, "$25.00 discount applied");

        Ok(())
    }

    #[test]
    fn unmet_minimum_is_invalid_and_names_the_minimum() -> TestResult {
        let table = PromoTable::standard();

        let result = table.evaluate("FLAT25", Money::from_minor(50_00, USD))?;

        assert!(!result.valid);
        assert_eq!(result.discount, Money::from_minor(0, USD));
        assert!(
            result.message.contains("minimum purchase"),
            "message should state the minimum, got: {}",
            result.message
        );
        assert!(
            result.message.contains("150"),
            "message should include the minimum amount, got: {}",
            result.message
        );

        Ok(())
    }

    #[test]
    fn fixed_discount_is_not_clamped_to_subtotal() -> TestResult {
        let table = PromoTable::new([(
            "BIG",
            PromoRule::amount_off(Money::from_minor(500_00, USD)),
        )]);

        let result = table.evaluate("BIG", Money::from_minor(100_00, USD))?;

        assert!(result.valid);
        assert_eq!(result.discount, Money::from_minor(500_00, USD));

        Ok(())
    }

    #[test]
    fn evaluation_is_idempotent() -> TestResult {
        let table = PromoTable::standard();
        let subtotal = Money::from_minor(475_00, USD);

        let first = table.evaluate("SPECIAL15", subtotal)?;
        let second = table.evaluate("SPECIAL15", subtotal)?;

        assert_eq!(first, second);

        Ok(())
    }
}
