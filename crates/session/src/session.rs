//! Cart session.
//!
//! Wraps one user's [`Cart`] with a persistence gateway. Every cart mutation
//! applies synchronously in memory first and is then mirrored to the gateway;
//! a mirror failure is logged and surfaced as a notice but never rolls the
//! in-memory state back. Saved and shared carts are full-snapshot operations
//! on top of the same gateway.

use std::sync::Arc;

use tracing::{info, warn};
use trolley::{
    catalog::{Catalog, Service, ServiceId},
    notify::{NoticeKind, Notifier},
    ops::{Cart, CartError},
    snapshot::CartSnapshot,
};

use crate::{
    errors::GatewayError,
    gateway::{CartGateway, SavedCart},
};

/// One user's cart plus its persistence and sharing backend.
pub struct CartSession {
    cart: Cart,
    catalog: Catalog,
    gateway: Arc<dyn CartGateway>,
    notifier: Arc<dyn Notifier>,
    share_base: String,
}

impl std::fmt::Debug for CartSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartSession")
            .field("cart", &self.cart)
            .field("share_base", &self.share_base)
            .finish_non_exhaustive()
    }
}

impl CartSession {
    /// Create a session over an existing cart.
    ///
    /// `share_base` is the origin share links are built from, without a
    /// trailing slash, e.g. `https://shop.example.com`.
    pub fn new(
        cart: Cart,
        catalog: Catalog,
        gateway: Arc<dyn CartGateway>,
        notifier: Arc<dyn Notifier>,
        share_base: impl Into<String>,
    ) -> Self {
        Self {
            cart,
            catalog,
            gateway,
            notifier,
            share_base: share_base.into(),
        }
    }

    /// The wrapped cart, read-only.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The catalog snapshots resolve against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Load the mirrored current cart from the gateway, if one exists.
    ///
    /// Call once at session start. Returns whether a cart was restored. An
    /// unreadable or unresolvable snapshot is logged and skipped; the session
    /// starts empty instead of failing.
    #[tracing::instrument(name = "session.resume", skip(self))]
    pub async fn resume(&mut self) -> bool {
        let snapshot = match self.gateway.load_current().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return false,
            Err(source) => {
                warn!("failed to load current cart: {source}");
                return false;
            }
        };

        match self.cart.restore_snapshot(&snapshot, &self.catalog) {
            Ok(()) => {
                info!(lines = snapshot.lines.len(), "resumed current cart");
                true
            }
            Err(source) => {
                warn!("stored cart no longer resolves against the catalog: {source}");
                false
            }
        }
    }

    /// Add one unit of a service and mirror the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the in-memory mutation fails. Mirror
    /// failures are notified, not returned.
    pub async fn add_to_cart(
        &mut self,
        service: &Service,
        notes: Option<&str>,
    ) -> Result<(), CartError> {
        self.cart.add_to_cart(service, notes)?;
        self.mirror_current().await;

        Ok(())
    }

    /// Remove a service's line and mirror the cart.
    pub async fn remove_from_cart(&mut self, id: &ServiceId) {
        self.cart.remove_from_cart(id);
        self.mirror_current().await;
    }

    /// Set a line's quantity and mirror the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the in-memory mutation fails.
    pub async fn update_quantity(&mut self, id: &ServiceId, quantity: u32) -> Result<(), CartError> {
        self.cart.update_quantity(id, quantity)?;
        self.mirror_current().await;

        Ok(())
    }

    /// Replace a line's notes and mirror the cart.
    pub async fn update_notes(&mut self, id: &ServiceId, notes: &str) {
        self.cart.update_notes(id, notes);
        self.mirror_current().await;
    }

    /// Empty the cart and mirror the (now empty) state.
    pub async fn clear_cart(&mut self) {
        self.cart.clear_cart();
        self.mirror_current().await;
    }

    /// Apply a promo code and mirror the cart when it changed.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the in-memory evaluation fails.
    pub async fn apply_promo_code(&mut self, code: &str) -> Result<bool, CartError> {
        let applied = self.cart.apply_promo_code(code)?;
        if applied {
            self.mirror_current().await;
        }

        Ok(applied)
    }

    /// Drop any applied promo code and mirror the cart.
    pub async fn remove_promo_code(&mut self) {
        self.cart.remove_promo_code();
        self.mirror_current().await;
    }

    /// Save the current cart under a name for later.
    ///
    /// With no name given, the cart is named `Cart {n}` where `n` is one past
    /// the current saved count. Returns the saved cart's id, or `None` when
    /// the cart is empty or the backend rejects the save.
    #[tracing::instrument(name = "session.save_for_later", skip(self, name))]
    pub async fn save_cart_for_later(&mut self, name: Option<&str>) -> Option<String> {
        let snapshot = self.cart.snapshot();
        if snapshot.is_empty() {
            self.notifier
                .notify(NoticeKind::Error, "Cannot save an empty cart");
            return None;
        }

        let generated;
        let name = match name {
            Some(name) => name,
            None => {
                let count = match self.gateway.list_saved().await {
                    Ok(saved) => saved.len(),
                    Err(source) => {
                        warn!("failed to list saved carts: {source}");
                        0
                    }
                };
                generated = format!("Cart {}", count + 1);
                &generated
            }
        };

        match self.gateway.create_saved(name, &snapshot).await {
            Ok(record) => {
                info!(saved_id = %record.id, "saved cart for later");
                self.notifier
                    .notify(NoticeKind::Success, "Cart saved for later");
                Some(record.id)
            }
            Err(source) => {
                warn!("failed to save cart: {source}");
                self.notifier
                    .notify(NoticeKind::Error, "Failed to save cart");
                None
            }
        }
    }

    /// Replace the current cart with a previously saved one.
    ///
    /// Returns whether the load succeeded. On any failure the in-memory cart
    /// is left untouched.
    #[tracing::instrument(name = "session.load_saved", skip(self))]
    pub async fn load_saved_cart(&mut self, id: &str) -> bool {
        let saved = match self.gateway.list_saved().await {
            Ok(saved) => saved,
            Err(source) => {
                warn!("failed to list saved carts: {source}");
                self.notifier
                    .notify(NoticeKind::Error, "Saved cart not found");
                return false;
            }
        };

        let Some(record) = saved.into_iter().find(|record| record.id == id) else {
            self.notifier
                .notify(NoticeKind::Error, "Saved cart not found");
            return false;
        };

        if let Err(source) = self.cart.restore_snapshot(&record.snapshot, &self.catalog) {
            warn!("saved cart no longer resolves against the catalog: {source}");
            self.notifier
                .notify(NoticeKind::Error, "Saved cart not found");
            return false;
        }

        self.mirror_current().await;
        self.notifier.notify(NoticeKind::Success, "Saved cart loaded");

        true
    }

    /// Delete a saved cart by id. Returns whether a cart was deleted.
    #[tracing::instrument(name = "session.delete_saved", skip(self))]
    pub async fn delete_saved_cart(&self, id: &str) -> bool {
        match self.gateway.delete_saved(id).await {
            Ok(()) => true,
            Err(GatewayError::NotFound) => {
                self.notifier
                    .notify(NoticeKind::Error, "Saved cart not found");
                false
            }
            Err(source) => {
                warn!("failed to delete saved cart: {source}");
                self.notifier
                    .notify(NoticeKind::Error, "Failed to delete saved cart");
                false
            }
        }
    }

    /// The saved carts list, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the backend cannot be read.
    pub async fn saved_carts(&self) -> Result<Vec<SavedCart>, GatewayError> {
        self.gateway.list_saved().await
    }

    /// Publish the current cart for sharing and return its link.
    ///
    /// Returns `None` when the cart is empty or the backend rejects the
    /// publish.
    #[tracing::instrument(name = "session.share", skip(self))]
    pub async fn share_cart(&self) -> Option<String> {
        let snapshot = self.cart.snapshot();
        if snapshot.is_empty() {
            self.notifier
                .notify(NoticeKind::Error, "Cannot share an empty cart");
            return None;
        }

        match self.gateway.create_shared(&snapshot).await {
            Ok(id) => {
                let link = format!("{}/shared-cart/{id}", self.share_base);
                info!(share_id = %id, "shared cart");
                self.notifier
                    .notify(NoticeKind::Success, "Cart link created");
                Some(link)
            }
            Err(source) => {
                warn!("failed to share cart: {source}");
                self.notifier
                    .notify(NoticeKind::Error, "Failed to share cart");
                None
            }
        }
    }

    /// Replace the current cart with a shared one fetched by id.
    ///
    /// Returns whether the load succeeded. On any failure the in-memory cart
    /// is left untouched.
    #[tracing::instrument(name = "session.load_shared", skip(self))]
    pub async fn load_shared_cart(&mut self, id: &str) -> bool {
        let snapshot = match self.gateway.fetch_shared(id).await {
            Ok(snapshot) => snapshot,
            Err(GatewayError::NotFound) => {
                self.notifier
                    .notify(NoticeKind::Error, "Shared cart not found");
                return false;
            }
            Err(source) => {
                warn!("failed to fetch shared cart: {source}");
                self.notifier
                    .notify(NoticeKind::Error, "Shared cart not found");
                return false;
            }
        };

        if let Err(source) = self.cart.restore_snapshot(&snapshot, &self.catalog) {
            warn!("shared cart no longer resolves against the catalog: {source}");
            self.notifier
                .notify(NoticeKind::Error, "Shared cart not found");
            return false;
        }

        self.mirror_current().await;
        self.notifier
            .notify(NoticeKind::Success, "Shared cart loaded");

        true
    }

    /// Mirror the in-memory cart to the gateway. Never rolls back on failure.
    async fn mirror_current(&self) {
        let snapshot = self.cart.snapshot();

        if let Err(source) = self.gateway.save_current(&snapshot).await {
            warn!("failed to mirror current cart: {source}");
            self.notifier
                .notify(NoticeKind::Error, "Failed to save cart");
        }
    }
}
