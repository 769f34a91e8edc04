//! Key/value store backends

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use tracing::debug;

use crate::{Result, StorageError};

/// String-keyed persistent slots
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a slot; `None` when it was never written or has been removed
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a slot, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot, returning whether it existed
    async fn remove(&self, key: &str) -> Result<bool>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key).await
    }
}

/// In-memory store; contents live as long as the process
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self.data.write().await;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut data = self.data.write().await;
        Ok(data.remove(key).is_some())
    }
}

/// One file per key under a base directory
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// `{encoded key}.slot`; distinct keys always map to distinct files
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.base_path.join(format!("{}.slot", encode_key(key))))
    }

    async fn ensure_base_dir(&self) -> Result<()> {
        if !self.base_path.exists() {
            debug!("Creating store directory {:?}", self.base_path);
            fs::create_dir_all(&self.base_path).await?;
        }
        Ok(())
    }
}

/// Percent-encode everything but `[A-Za-z0-9-_.~]`, so path separators and
/// reserved characters never reach the file system
fn encode_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(fs::read_to_string(&path).await?))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        self.ensure_base_dir().await?;

        // write-then-rename so a crash never leaves a half-written slot
        let tmp = path.with_extension("slot.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let path = self.key_path(key)?;
        if path.exists() {
            fs::remove_file(&path).await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
