use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::errors::Result;

/// A named collection persisted as a single JSON file.
///
/// Every public operation is one atomic load-mutate-persist cycle: the
/// internal lock is held for the whole cycle, so no operation ever
/// observes the collection mid-mutation, and writes cannot interleave.
pub struct FileCollection<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FileCollection<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    /// Load the collection for read-only access.
    pub async fn read(&self) -> Result<T> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Load the collection, apply `mutate`, and persist the result.
    ///
    /// The file is rewritten only when `mutate` returns `Ok`; a failed
    /// mutation leaves the persisted collection untouched.
    pub async fn update<R, F>(&self, mutate: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R>,
    {
        let _guard = self.lock.lock().await;
        let mut value = self.load().await?;
        let out = mutate(&mut value)?;
        self.persist(&value).await?;
        Ok(out)
    }

    async fn load(&self) -> Result<T> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(value),
            Err(err) => {
                // Malformed content is recovered as an empty collection
                // rather than wedging every request that touches it.
                tracing::warn!(
                    "malformed collection file {}, starting empty: {}",
                    self.path.display(),
                    err
                );
                Ok(T::default())
            }
        }
    }

    async fn persist(&self, value: &T) -> Result<()> {
        let content = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}
