//! Trolley
//!
//! Trolley is a cart pricing and promotion engine for service storefronts: quantity
//! tier discounts, promo codes, derived totals and portable cart snapshots.

pub mod catalog;
pub mod fixtures;
pub mod ledger;
pub mod notify;
pub mod ops;
pub mod prelude;
pub mod pricing;
pub mod promos;
pub mod snapshot;
pub mod totals;
