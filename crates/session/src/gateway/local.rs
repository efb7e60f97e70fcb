//! JSON file gateway.
//!
//! Persists one identity's carts under a directory: `current_cart.json` for
//! the mirrored session cart, `saved_carts.json` for the named list, and
//! `shared/{id}.json` per shared cart. Writes go through a temp file and
//! rename so a crash never leaves a half-written payload behind.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use jiff::Timestamp;
use trolley::snapshot::CartSnapshot;

use crate::{
    errors::GatewayError,
    gateway::{CartGateway, SavedCart},
    ids::share_id,
};

const CURRENT_FILE: &str = "current_cart.json";
const SAVED_FILE: &str = "saved_carts.json";
const SHARED_DIR: &str = "shared";

/// A gateway backed by JSON files in a local directory.
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    dir: PathBuf,
}

impl JsonFileGateway {
    /// Create a gateway rooted at the given directory. The directory is
    /// created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn current_path(&self) -> PathBuf {
        self.dir.join(CURRENT_FILE)
    }

    fn saved_path(&self) -> PathBuf {
        self.dir.join(SAVED_FILE)
    }

    fn shared_path(&self, id: &str) -> Result<PathBuf, GatewayError> {
        // Share ids are generated, so anything with path syntax is a bad
        // lookup rather than a legitimate id.
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(GatewayError::NotFound);
        }

        Ok(self.dir.join(SHARED_DIR).join(format!("{id}.json")))
    }

    async fn write_json<T: serde::Serialize>(
        &self,
        path: &Path,
        value: &T,
    ) -> Result<(), GatewayError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let payload = serde_json::to_vec_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, payload).await?;
        tokio::fs::rename(&tmp, path).await?;

        Ok(())
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &Path,
    ) -> Result<Option<T>, GatewayError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl CartGateway for JsonFileGateway {
    async fn save_current(&self, snapshot: &CartSnapshot) -> Result<(), GatewayError> {
        self.write_json(&self.current_path(), snapshot).await
    }

    async fn load_current(&self) -> Result<Option<CartSnapshot>, GatewayError> {
        self.read_json(&self.current_path()).await
    }

    async fn list_saved(&self) -> Result<Vec<SavedCart>, GatewayError> {
        let mut saved: Vec<SavedCart> = self
            .read_json(&self.saved_path())
            .await?
            .unwrap_or_default();
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

        let mut saved = self.list_saved().await?;
        saved.push(record.clone());
        self.write_json(&self.saved_path(), &saved).await?;

        Ok(record)
    }

    async fn delete_saved(&self, id: &str) -> Result<(), GatewayError> {
        let mut saved = self.list_saved().await?;
        let before = saved.len();
        saved.retain(|record| record.id != id);

        if saved.len() == before {
            return Err(GatewayError::NotFound);
        }

        self.write_json(&self.saved_path(), &saved).await
    }

    async fn create_shared(&self, snapshot: &CartSnapshot) -> Result<String, GatewayError> {
        let id = share_id();
        let path = self.shared_path(&id)?;
        self.write_json(&path, snapshot).await?;

        Ok(id)
    }

    async fn fetch_shared(&self, id: &str) -> Result<CartSnapshot, GatewayError> {
        let path = self.shared_path(id)?;

        self.read_json(&path).await?.ok_or(GatewayError::NotFound)
    }
}
