use std::future::Future;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::info;

/// Narrow storage interface for one collection.
///
/// Callers only ever go through these four operations, so the flat-file
/// implementation below can be replaced by an embedded store later.
pub trait Repository<T> {
    /// Every record, in storage order.
    fn list(&self) -> impl Future<Output = Result<Vec<T>>> + Send;

    fn append(&self, item: T) -> impl Future<Output = Result<()>> + Send;

    /// Apply `f` to the first record matching `pred` and persist.
    /// Returns `false` (and writes nothing) when no record matches.
    fn update<P, F>(&self, pred: P, f: F) -> impl Future<Output = Result<bool>> + Send
    where
        P: Fn(&T) -> bool + Send,
        F: FnOnce(&mut T) + Send;

    fn find_by<P>(&self, pred: P) -> impl Future<Output = Result<Option<T>>> + Send
    where
        P: Fn(&T) -> bool + Send;
}

/// A collection stored as one pretty-printed JSON array file.
///
/// Every read parses the whole file and every write replaces it. There is no
/// locking: two overlapping load/save sequences can lose an update.
pub struct JsonFile<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file holding an empty array if it does not exist yet.
    pub async fn ensure(&self) -> Result<()> {
        if fs::try_exists(&self.path).await? {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        fs::write(&self.path, "[]")
            .await
            .with_context(|| format!("creating {}", self.path.display()))?;
        info!("Created empty collection at {}", self.path.display());
        Ok(())
    }

    /// Read and parse the whole collection.
    pub async fn load(&self) -> Result<Vec<T>> {
        self.ensure().await?;

        let data = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        let items = serde_json::from_str(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(items)
    }

    /// Overwrite the file with `items`.
    pub async fn save(&self, items: &[T]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, json)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

impl<T> Repository<T> for JsonFile<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn list(&self) -> Result<Vec<T>> {
        self.load().await
    }

    async fn append(&self, item: T) -> Result<()> {
        let mut items = self.load().await?;
        items.push(item);
        self.save(&items).await
    }

    async fn update<P, F>(&self, pred: P, f: F) -> Result<bool>
    where
        P: Fn(&T) -> bool + Send,
        F: FnOnce(&mut T) + Send,
    {
        let mut items = self.load().await?;
        let Some(idx) = items.iter().position(|item| pred(item)) else {
            return Ok(false);
        };
        f(&mut items[idx]);
        self.save(&items).await?;
        Ok(true)
    }

    async fn find_by<P>(&self, pred: P) -> Result<Option<T>>
    where
        P: Fn(&T) -> bool + Send,
    {
        let items = self.load().await?;
        Ok(items.into_iter().find(|item| pred(item)))
    }
}
