//! Cart operations
//!
//! The mutation API over the ledger. Every operation applies synchronously
//! and completely before returning, re-runs the whole-ledger discount pass
//! when quantities change, and reports outcomes through the injected
//! [`Notifier`]. One cart instance belongs to one session; it is never shared
//! mutable state.

use std::sync::Arc;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::{Catalog, Service, ServiceId},
    ledger::{CartLedger, LedgerError, LineChange, QuantityUpdate},
    notify::{NoticeKind, Notifier},
    pricing::{DiscountSchedule, PricingError},
    promos::PromoTable,
    snapshot::{CartSnapshot, SnapshotError},
    totals::{self, TotalsError},
};

/// Errors surfaced by cart operations.
///
/// User-input problems (bad promo codes, zero quantities, empty-cart saves)
/// are not errors; they come back as ordinary return values plus a notice.
/// These variants cover arithmetic and reference faults only.
#[derive(Debug, Error)]
pub enum CartError {
    /// Wrapped ledger mutation error.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Wrapped totals aggregation error.
    #[error(transparent)]
    Totals(#[from] TotalsError),

    /// Wrapped discount calculation error.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped snapshot restore error.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// A session's cart: the ledger plus the pricing rules that govern it and the
/// notifier that surfaces its state changes.
pub struct Cart {
    ledger: CartLedger,
    schedule: DiscountSchedule,
    promos: PromoTable,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("ledger", &self.ledger)
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

impl Cart {
    /// Create an empty cart with the standard discount schedule and promo
    /// table.
    pub fn new(currency: &'static Currency, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_rules(
            currency,
            DiscountSchedule::standard(),
            PromoTable::standard(),
            notifier,
        )
    }

    /// Create an empty cart with custom pricing rules.
    pub fn with_rules(
        currency: &'static Currency,
        schedule: DiscountSchedule,
        promos: PromoTable,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            ledger: CartLedger::new(currency),
            schedule,
            promos,
            notifier,
        }
    }

    /// The underlying ledger, read-only.
    pub fn ledger(&self) -> &CartLedger {
        &self.ledger
    }

    /// The quantity discount schedule in force.
    pub fn schedule(&self) -> &DiscountSchedule {
        &self.schedule
    }

    /// The promo table in force.
    pub fn promos(&self) -> &PromoTable {
        &self.promos
    }

    /// Add one unit of a service, merging into an existing line if present.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] on currency mismatch or if the discount
    /// recompute fails.
    pub fn add_to_cart(
        &mut self,
        service: &Service,
        notes: Option<&str>,
    ) -> Result<(), CartError> {
        let change = self.ledger.add(service, notes)?;
        self.ledger.recompute_unit_discounts(&self.schedule)?;

        let message = match change {
            LineChange::Added => format!("{} added to cart", service.name),
            LineChange::Incremented => format!("Added another {} to cart", service.name),
        };
        self.notifier.notify(NoticeKind::Success, &message);

        Ok(())
    }

    /// Remove a service's line entirely. No-op if the line is absent.
    pub fn remove_from_cart(&mut self, id: &ServiceId) {
        if let Some(removed) = self.ledger.remove(id) {
            self.notifier.notify(
                NoticeKind::Info,
                &format!("{} removed from cart", removed.service().name),
            );
        }
    }

    /// Set a line's quantity. Quantities below one are rejected silently;
    /// removal goes through [`Cart::remove_from_cart`] only. No-op if the
    /// line is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the discount recompute fails.
    pub fn update_quantity(&mut self, id: &ServiceId, quantity: u32) -> Result<(), CartError> {
        if self.ledger.set_quantity(id, quantity) == QuantityUpdate::Updated {
            self.ledger.recompute_unit_discounts(&self.schedule)?;
        }

        Ok(())
    }

    /// Replace a line's notes. Notes never affect pricing, so no discount
    /// recompute runs. No-op if the line is absent.
    pub fn update_notes(&mut self, id: &ServiceId, notes: &str) {
        self.ledger.set_notes(id, notes);
    }

    /// Remove every line and reset promo state.
    pub fn clear_cart(&mut self) {
        self.ledger.clear();
        self.notifier.notify(NoticeKind::Info, "Cart cleared");
    }

    /// Apply a promo code, evaluating it against the gross subtotal.
    ///
    /// Returns whether the code applied. An invalid code leaves any
    /// previously applied promo untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the subtotal or discount arithmetic fails.
    pub fn apply_promo_code(&mut self, code: &str) -> Result<bool, CartError> {
        let subtotal = totals::subtotal(&self.ledger)?;
        let evaluation = self.promos.evaluate(code, subtotal)?;

        if evaluation.valid {
            self.ledger.set_promo(code, evaluation.discount);
            self.notifier.notify(
                NoticeKind::Success,
                &format!("Promo code applied: {}", evaluation.message),
            );
        } else {
            self.notifier.notify(
                NoticeKind::Error,
                &format!("Invalid promo code: {}", evaluation.message),
            );
        }

        Ok(evaluation.valid)
    }

    /// Drop any applied promo code.
    pub fn remove_promo_code(&mut self) {
        self.ledger.clear_promo();
        self.notifier.notify(NoticeKind::Info, "Promo code removed");
    }

    /// Gross subtotal over all lines.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if money arithmetic fails.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, CartError> {
        Ok(totals::subtotal(&self.ledger)?)
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u32 {
        totals::item_count(&self.ledger)
    }

    /// Amount due after item-level and promo discounts, floored at zero.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if money arithmetic fails.
    pub fn discounted_total(&self) -> Result<Money<'static, Currency>, CartError> {
        Ok(totals::total_due(&self.ledger)?)
    }

    /// Capture the cart as a snapshot for persistence or sharing.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::capture(&self.ledger)
    }

    /// Overwrite the cart with a snapshot's contents. This is a full
    /// replacement, not a merge; on error the cart is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a snapshot line cannot be resolved against
    /// the catalog.
    pub fn restore_snapshot(
        &mut self,
        snapshot: &CartSnapshot,
        catalog: &Catalog,
    ) -> Result<(), CartError> {
        self.ledger = snapshot.restore(catalog, self.ledger.currency())?;

        Ok(())
    }
}
