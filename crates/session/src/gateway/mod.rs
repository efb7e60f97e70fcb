//! Cart gateways.
//!
//! The persistence seam: a [`CartGateway`] stores cart snapshots for a single
//! identity, bound at construction. Three stores hang off one trait: the
//! session's current cart (mirrored after every mutation), named saved carts,
//! and shared carts addressable by id.

pub mod local;
pub mod memory;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde::{Deserialize, Serialize};
use trolley::snapshot::CartSnapshot;

use crate::errors::GatewayError;

/// A named cart snapshot saved for later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCart {
    /// Backend-assigned id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// The saved cart contents.
    pub snapshot: CartSnapshot,

    /// When the cart was saved.
    pub saved_at: Timestamp,
}

/// Persistence backend for cart snapshots.
#[automock]
#[async_trait]
pub trait CartGateway: Send + Sync {
    /// Overwrite the current cart snapshot. Last write wins.
    async fn save_current(&self, snapshot: &CartSnapshot) -> Result<(), GatewayError>;

    /// Load the current cart snapshot, if one was ever saved.
    async fn load_current(&self) -> Result<Option<CartSnapshot>, GatewayError>;

    /// List saved carts, newest first.
    async fn list_saved(&self) -> Result<Vec<SavedCart>, GatewayError>;

    /// Save a named cart, returning the stored record.
    async fn create_saved(
        &self,
        name: &str,
        snapshot: &CartSnapshot,
    ) -> Result<SavedCart, GatewayError>;

    /// Delete a saved cart by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] if no saved cart has the id.
    async fn delete_saved(&self, id: &str) -> Result<(), GatewayError>;

    /// Publish a snapshot for sharing, returning its share id.
    async fn create_shared(&self, snapshot: &CartSnapshot) -> Result<String, GatewayError>;

    /// Fetch a shared snapshot by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] if no shared cart has the id.
    async fn fetch_shared(&self, id: &str) -> Result<CartSnapshot, GatewayError>;
}
