//! Snapshots
//!
//! The serialized cart shape used for persistence and sharing. Lines carry
//! service ids only; the full service record is re-resolved against the
//! catalog at restore time so persisted carts pick up current prices instead
//! of freezing stale catalog copies. Monetary amounts are minor units.

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    catalog::{Catalog, ServiceId},
    ledger::{AppliedPromo, CartLedger, LineItem},
};

/// Errors that can occur while restoring a snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// A snapshot line references a service the catalog no longer has.
    #[error("service {0} not found in catalog")]
    UnknownService(ServiceId),

    /// A snapshot line carries a quantity below one.
    #[error("service {0} has an invalid quantity")]
    InvalidQuantity(ServiceId),

    /// A resolved service's currency differs from the cart currency.
    #[error("service {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ServiceId, &'static str, &'static str),
}

/// One serialized cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotLine {
    /// Id of the referenced service.
    pub service_id: ServiceId,

    /// Units in the cart.
    pub quantity: u32,

    /// Free-form notes.
    #[serde(default)]
    pub notes: String,

    /// Cached per-unit quantity discount, in minor units.
    #[serde(default)]
    pub applied_discount: i64,
}

/// A serialized cart: lines plus promo state.
///
/// Promo fields are defaultable so payloads written by backends that never
/// recorded them still deserialize, as no code and zero discount.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Serialized lines in display order.
    pub lines: Vec<SnapshotLine>,

    /// Applied promo code, if any.
    #[serde(default)]
    pub promo_code: Option<String>,

    /// Promo discount in minor units.
    #[serde(default)]
    pub promo_discount: i64,
}

impl CartSnapshot {
    /// Capture the current ledger state as a snapshot (a deep copy; later
    /// ledger mutations never reach it).
    pub fn capture(ledger: &CartLedger) -> Self {
        let lines = ledger
            .lines()
            .iter()
            .map(|line| SnapshotLine {
                service_id: line.service().id.clone(),
                quantity: line.quantity(),
                notes: line.notes().to_owned(),
                applied_discount: line.unit_discount().to_minor_units(),
            })
            .collect();

        Self {
            lines,
            promo_code: ledger.promo().map(|promo| promo.code().to_owned()),
            promo_discount: ledger.promo_discount().to_minor_units(),
        }
    }

    /// Check whether the snapshot has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Rebuild a ledger from this snapshot, resolving service ids against the
    /// catalog.
    ///
    /// Duplicate lines for the same service merge by summing quantities. The
    /// whole restore fails, leaving no partial state, if any line cannot be
    /// resolved.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if a line's service is missing from the
    /// catalog, has a quantity below one, or is priced in another currency.
    pub fn restore(
        &self,
        catalog: &Catalog,
        currency: &'static Currency,
    ) -> Result<CartLedger, SnapshotError> {
        let mut lines: Vec<LineItem> = Vec::with_capacity(self.lines.len());

        for snapshot_line in &self.lines {
            let service = catalog
                .get(&snapshot_line.service_id)
                .ok_or_else(|| SnapshotError::UnknownService(snapshot_line.service_id.clone()))?;

            if snapshot_line.quantity < 1 {
                return Err(SnapshotError::InvalidQuantity(
                    snapshot_line.service_id.clone(),
                ));
            }

            let service_currency = service.price.currency();
            if service_currency != currency {
                return Err(SnapshotError::CurrencyMismatch(
                    snapshot_line.service_id.clone(),
                    service_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if let Some(existing) = lines
                .iter_mut()
                .find(|line| line.service.id == snapshot_line.service_id)
            {
                existing.quantity += snapshot_line.quantity;
                continue;
            }

            let mut line = LineItem::new(service.clone(), snapshot_line.notes.clone());
            line.quantity = snapshot_line.quantity;
            line.unit_discount = Money::from_minor(snapshot_line.applied_discount, currency);
            lines.push(line);
        }

        let promo = self.promo_code.clone().map(|code| AppliedPromo {
            code,
            discount: Money::from_minor(self.promo_discount, currency),
        });

        Ok(CartLedger::from_parts(lines, promo, currency))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::catalog::Service;

    use super::*;

    fn service(id: &str, price_minor: i64) -> Service {
        Service {
            id: ServiceId::from(id),
            name: format!("Service {id}"),
            price: Money::from_minor(price_minor, iso::USD),
            category: "Testing".to_owned(),
            rating: 4.5,
            image: String::new(),
        }
    }

    fn catalog() -> Catalog {
        [service("1", 100_00), service("2", 40_00)]
            .into_iter()
            .collect()
    }

    fn populated_ledger() -> Result<CartLedger, crate::ledger::LedgerError> {
        let mut ledger = CartLedger::new(iso::USD);
        ledger.add(&service("1", 100_00), Some("back entrance"))?;
        ledger.add(&service("2", 40_00), None)?;
        ledger.set_quantity(&ServiceId::from("1"), 5);
        ledger.recompute_unit_discounts(&crate::pricing::DiscountSchedule::standard())?;
        ledger.set_promo("SAVE20", Money::from_minor(108_00, iso::USD));

        Ok(ledger)
    }

    #[test]
    fn round_trip_preserves_lines_and_promo_state() -> TestResult {
        let ledger = populated_ledger()?;

        let snapshot = CartSnapshot::capture(&ledger);
        let json = serde_json::to_string(&snapshot)?;
        let decoded: CartSnapshot = serde_json::from_str(&json)?;
        let restored = decoded.restore(&catalog(), iso::USD)?;

        assert_eq!(restored.len(), ledger.len());
        for (restored_line, original_line) in restored.lines().iter().zip(ledger.lines()) {
            assert_eq!(restored_line.service().id, original_line.service().id);
            assert_eq!(restored_line.quantity(), original_line.quantity());
            assert_eq!(restored_line.notes(), original_line.notes());
            assert_eq!(restored_line.unit_discount(), original_line.unit_discount());
        }
        assert_eq!(
            restored.promo().map(|promo| promo.code().to_owned()),
            Some("SAVE20".to_owned())
        );
        assert_eq!(restored.promo_discount(), Money::from_minor(108_00, iso::USD));

        Ok(())
    }

    #[test]
    fn serialized_shape_uses_camel_case_ids_only() -> TestResult {
        let ledger = populated_ledger()?;

        let json = serde_json::to_value(CartSnapshot::capture(&ledger))?;

        let first_line = json
            .get("lines")
            .and_then(|lines| lines.get(0))
            .expect("snapshot should have a first line");

        assert!(first_line.get("serviceId").is_some());
        assert!(first_line.get("appliedDiscount").is_some());
        assert!(
            first_line.get("price").is_none(),
            "snapshots must not embed catalog prices"
        );
        assert!(json.get("promoCode").is_some());

        Ok(())
    }

    #[test]
    fn missing_promo_fields_default_to_none_and_zero() -> TestResult {
        let json = r#"{"lines":[{"serviceId":"1","quantity":2}]}"#;

        let snapshot: CartSnapshot = serde_json::from_str(json)?;

        assert_eq!(snapshot.promo_code, None);
        assert_eq!(snapshot.promo_discount, 0);
        assert_eq!(
            snapshot.lines.first().map(|line| line.notes.as_str()),
            Some("")
        );

        Ok(())
    }

    #[test]
    fn restore_fails_on_unknown_service_id() {
        let snapshot = CartSnapshot {
            lines: vec![SnapshotLine {
                service_id: ServiceId::from("missing"),
                quantity: 1,
                notes: String::new(),
                applied_discount: 0,
            }],
            promo_code: None,
            promo_discount: 0,
        };

        let result = snapshot.restore(&catalog(), iso::USD);

        assert_eq!(
            result.err(),
            Some(SnapshotError::UnknownService(ServiceId::from("missing")))
        );
    }

    #[test]
    fn restore_merges_duplicate_lines() -> TestResult {
        let line = SnapshotLine {
            service_id: ServiceId::from("1"),
            quantity: 2,
            notes: String::new(),
            applied_discount: 0,
        };
        let snapshot = CartSnapshot {
            lines: vec![line.clone(), line],
            promo_code: None,
            promo_discount: 0,
        };

        let restored = snapshot.restore(&catalog(), iso::USD)?;

        assert_eq!(restored.len(), 1);
        assert_eq!(
            restored.line(&ServiceId::from("1")).map(LineItem::quantity),
            Some(4)
        );

        Ok(())
    }

    #[test]
    fn restore_resolves_current_catalog_prices() -> TestResult {
        let snapshot = CartSnapshot {
            lines: vec![SnapshotLine {
                service_id: ServiceId::from("1"),
                quantity: 1,
                notes: String::new(),
                applied_discount: 0,
            }],
            promo_code: None,
            promo_discount: 0,
        };

        // The catalog price changed after the snapshot was taken.
        let repriced: Catalog = [service("1", 120_00)].into_iter().collect();
        let restored = snapshot.restore(&repriced, iso::USD)?;

        assert_eq!(
            restored.line(&ServiceId::from("1")).map(|line| line.service().price),
            Some(Money::from_minor(120_00, iso::USD))
        );

        Ok(())
    }
}
