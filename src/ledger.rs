//! Ledger
//!
//! The in-memory cart state: an ordered list of line items keyed by service
//! id, plus cart-level promo state. Mutations keep two invariants: no two
//! lines for the same service, and no line with a quantity below one.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::{Service, ServiceId},
    pricing::{DiscountSchedule, PricingError},
};

/// Errors related to ledger mutation.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A service's currency differs from the cart currency (service currency, cart currency).
    #[error("Service has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Errors bubbled up from discount recomputation.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// One entry in the cart: a service, how many units, optional notes, and the
/// cached per-unit quantity discount.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub(crate) service: Service,
    pub(crate) quantity: u32,
    pub(crate) notes: String,
    pub(crate) unit_discount: Money<'static, Currency>,
}

impl LineItem {
    pub(crate) fn new(service: Service, notes: String) -> Self {
        let zero = Money::from_minor(0, service.price.currency());

        Self {
            service,
            quantity: 1,
            notes,
            unit_discount: zero,
        }
    }

    /// The service this line refers to.
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Units of the service in the cart, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Free-form notes attached to the line.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Cached per-unit quantity discount, recomputed after every quantity change.
    pub fn unit_discount(&self) -> Money<'static, Currency> {
        self.unit_discount
    }
}

/// Cart-level promo state: the applied code and its discount amount.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPromo {
    pub(crate) code: String,
    pub(crate) discount: Money<'static, Currency>,
}

impl AppliedPromo {
    /// The promo code as entered.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The discount the code granted when it was applied.
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }
}

/// Outcome of adding a service to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    /// A new line was created with quantity one.
    Added,

    /// An existing line's quantity was incremented.
    Incremented,
}

/// Outcome of a quantity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The quantity was below one; the ledger was left untouched.
    Rejected,

    /// No line exists for the service; nothing to update.
    Missing,

    /// The line's quantity was changed.
    Updated,
}

/// The in-memory cart: ordered line items plus promo state.
#[derive(Debug, Clone)]
pub struct CartLedger {
    lines: Vec<LineItem>,
    promo: Option<AppliedPromo>,
    currency: &'static Currency,
}

impl CartLedger {
    /// Create an empty ledger in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            lines: Vec::new(),
            promo: None,
            currency,
        }
    }

    pub(crate) fn from_parts(
        lines: Vec<LineItem>,
        promo: Option<AppliedPromo>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            lines,
            promo,
            currency,
        }
    }

    /// The cart currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The line items in display (insertion) order.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Number of distinct lines, not units.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line for a service, if present.
    pub fn line(&self, id: &ServiceId) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.service.id == *id)
    }

    /// The applied promo, if any.
    pub fn promo(&self) -> Option<&AppliedPromo> {
        self.promo.as_ref()
    }

    /// The promo discount amount, zero when no code is applied.
    pub fn promo_discount(&self) -> Money<'static, Currency> {
        self.promo
            .as_ref()
            .map_or(Money::from_minor(0, self.currency), |promo| promo.discount)
    }

    /// Add one unit of a service.
    ///
    /// If no line exists for the service a new one is created with quantity
    /// one; otherwise the existing line's quantity is incremented. Notes only
    /// apply to newly created lines.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CurrencyMismatch`] if the service is priced in
    /// a different currency than the cart.
    pub fn add(&mut self, service: &Service, notes: Option<&str>) -> Result<LineChange, LedgerError> {
        let service_currency = service.price.currency();
        if service_currency != self.currency {
            return Err(LedgerError::CurrencyMismatch(
                service_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.service.id == service.id)
        {
            line.quantity += 1;
            return Ok(LineChange::Incremented);
        }

        self.lines.push(LineItem::new(
            service.clone(),
            notes.unwrap_or_default().to_owned(),
        ));

        Ok(LineChange::Added)
    }

    /// Remove a service's line entirely, returning it if it existed.
    pub fn remove(&mut self, id: &ServiceId) -> Option<LineItem> {
        let index = self.lines.iter().position(|line| line.service.id == *id)?;

        Some(self.lines.remove(index))
    }

    /// Set a line's quantity.
    ///
    /// Quantities below one are rejected without touching the ledger; removal
    /// goes through [`CartLedger::remove`] only.
    pub fn set_quantity(&mut self, id: &ServiceId, quantity: u32) -> QuantityUpdate {
        if quantity < 1 {
            return QuantityUpdate::Rejected;
        }

        match self
            .lines
            .iter_mut()
            .find(|line| line.service.id == *id)
        {
            Some(line) => {
                line.quantity = quantity;
                QuantityUpdate::Updated
            }
            None => QuantityUpdate::Missing,
        }
    }

    /// Replace a line's notes. Notes never affect pricing. Returns whether a
    /// line existed.
    pub fn set_notes(&mut self, id: &ServiceId, notes: &str) -> bool {
        match self
            .lines
            .iter_mut()
            .find(|line| line.service.id == *id)
        {
            Some(line) => {
                line.notes = notes.to_owned();
                true
            }
            None => false,
        }
    }

    /// Remove every line and reset promo state.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.promo = None;
    }

    /// Record an applied promo code and its discount.
    pub fn set_promo(&mut self, code: impl Into<String>, discount: Money<'static, Currency>) {
        self.promo = Some(AppliedPromo {
            code: code.into(),
            discount,
        });
    }

    /// Drop any applied promo code.
    pub fn clear_promo(&mut self) {
        self.promo = None;
    }

    /// Recompute every line's cached per-unit discount from its own quantity.
    ///
    /// The pass always covers the whole ledger, not just a changed line, so
    /// the cached values can never diverge from the schedule.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if a discount calculation fails.
    pub fn recompute_unit_discounts(
        &mut self,
        schedule: &DiscountSchedule,
    ) -> Result<(), LedgerError> {
        for line in &mut self.lines {
            line.unit_discount = schedule.unit_discount(line.service.price, line.quantity)?;
        }

        Ok(())
    }
}
