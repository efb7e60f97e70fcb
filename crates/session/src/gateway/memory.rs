//! In-memory gateway.
//!
//! Backs a single process, mostly for tests and demos. State lives behind a
//! std mutex; no lock is held across an await point.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use trolley::snapshot::CartSnapshot;

use crate::{
    errors::GatewayError,
    gateway::{CartGateway, SavedCart},
    ids::share_id,
};

#[derive(Debug, Default)]
struct State {
    current: Option<CartSnapshot>,
    saved: Vec<SavedCart>,
    shared: FxHashMap<String, CartSnapshot>,
}

/// A gateway that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<State>,
}

impl MemoryGateway {
    /// Create an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        f(&mut state)
    }
}

#[async_trait]
impl CartGateway for MemoryGateway {
    async fn save_current(&self, snapshot: &CartSnapshot) -> Result<(), GatewayError> {
        self.with_state(|state| state.current = Some(snapshot.clone()));

        Ok(())
    }

    async fn load_current(&self) -> Result<Option<CartSnapshot>, GatewayError> {
        Ok(self.with_state(|state| state.current.clone()))
    }

    async fn list_saved(&self) -> Result<Vec<SavedCart>, GatewayError> {
        let mut saved = self.with_state(|state| state.saved.clone());
        saved.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));

        Ok(saved)
    }

    async fn create_saved(
        &self,
        name: &str,
        snapshot: &CartSnapshot,
    ) -> Result<SavedCart, GatewayError> {
        let record = SavedCart {
            id: share_id(),
            name: name.to_owned(),
            snapshot: snapshot.clone(),
            saved_at: Timestamp::now(),
        };

        self.with_state(|state| state.saved.push(record.clone()));

        Ok(record)
    }

    async fn delete_saved(&self, id: &str) -> Result<(), GatewayError> {
        self.with_state(|state| {
            let before = state.saved.len();
            state.saved.retain(|saved| saved.id != id);

            if state.saved.len() == before {
                Err(GatewayError::NotFound)
            } else {
                Ok(())
            }
        })
    }

    async fn create_shared(&self, snapshot: &CartSnapshot) -> Result<String, GatewayError> {
        let id = share_id();
        self.with_state(|state| state.shared.insert(id.clone(), snapshot.clone()));

        Ok(id)
    }

    async fn fetch_shared(&self, id: &str) -> Result<CartSnapshot, GatewayError> {
        self.with_state(|state| state.shared.get(id).cloned())
            .ok_or(GatewayError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use trolley::snapshot::SnapshotLine;
    use trolley::catalog::ServiceId;

    use super::*;

    fn snapshot(quantity: u32) -> CartSnapshot {
        CartSnapshot {
            lines: vec![SnapshotLine {
                service_id: ServiceId::from("1"),
                quantity,
                notes: String::new(),
                applied_discount: 0,
            }],
            promo_code: None,
            promo_discount: 0,
        }
    }

    #[tokio::test]
    async fn current_cart_is_last_write_wins() -> TestResult {
        let gateway = MemoryGateway::new();

        assert!(gateway.load_current().await?.is_none());

        gateway.save_current(&snapshot(1)).await?;
        gateway.save_current(&snapshot(3)).await?;

        let current = gateway.load_current().await?.expect("current should exist");
        assert_eq!(current.lines[0].quantity, 3);

        Ok(())
    }

    #[tokio::test]
    async fn saved_carts_list_newest_first_and_delete_by_id() -> TestResult {
        let gateway = MemoryGateway::new();

        let first = gateway.create_saved("Cart 1", &snapshot(1)).await?;
        let second = gateway.create_saved("Cart 2", &snapshot(2)).await?;

        let listed = gateway.list_saved().await?;
        assert_eq!(listed.len(), 2);
        assert!(
            listed[0].saved_at >= listed[1].saved_at,
            "newest should come first"
        );

        gateway.delete_saved(&first.id).await?;
        let remaining = gateway.list_saved().await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);

        Ok(())
    }

    #[tokio::test]
    async fn delete_of_unknown_saved_cart_is_not_found() {
        let gateway = MemoryGateway::new();

        let result = gateway.delete_saved("missing").await;

        assert!(matches!(result, Err(GatewayError::NotFound)));
    }

    #[tokio::test]
    async fn shared_carts_round_trip_by_id() -> TestResult {
        let gateway = MemoryGateway::new();

        let id = gateway.create_shared(&snapshot(4)).await?;
        let fetched = gateway.fetch_shared(&id).await?;

        assert_eq!(fetched.lines[0].quantity, 4);
        assert!(matches!(
            gateway.fetch_shared("nope").await,
            Err(GatewayError::NotFound)
        ));

        Ok(())
    }
}
