//! Trolley prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{Catalog, Service, ServiceId},
    fixtures::sample_catalog,
    ledger::{AppliedPromo, CartLedger, LedgerError, LineItem},
    notify::{NoopNotifier, NoticeKind, Notifier, RecordingNotifier},
    ops::{Cart, CartError},
    pricing::{DiscountSchedule, PricingError, QuantityTier},
    promos::{PromoBenefit, PromoEvaluation, PromoRule, PromoTable},
    snapshot::{CartSnapshot, SnapshotError, SnapshotLine},
    totals::{TotalsError, item_count, item_discount_total, subtotal, total_due},
};
