//!
//! Flat-file implementation of the [`StoreBackend`] trait
//!
//! One JSON file per collection inside a data directory. Writes go through a
//! process-wide mutex; concurrent tanuki processes on the same directory are
//! not supported.
//!

use crate::{apply_patch, Predicate, Result, StoreBackend};
use serde_json::Value;
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::Mutex};

/// Flat-file store
#[derive(Clone)]
pub struct Store {
    data_dir: PathBuf,
    guard: Arc<Mutex<()>>,
}

impl Store {
    /// Open a store inside the given directory, creating it if necessary
    pub async fn create<P>(data_dir: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        fs::create_dir_all(&data_dir).await?;

        Ok(Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            guard: Arc::new(Mutex::new(())),
        })
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{collection}.json"))
    }

    async fn load(&self, collection: &str) -> Result<Vec<Value>> {
        match fs::read(self.collection_path(collection)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn persist(&self, collection: &str, documents: &[Value]) -> Result<()> {
        let serialised = serde_json::to_vec_pretty(documents)?;
        fs::write(self.collection_path(collection), serialised).await?;

        Ok(())
    }
}

impl StoreBackend for Store {
    async fn insert(&self, collection: &str, document: Value) -> Result<()> {
        let _guard = self.guard.lock().await;

        let mut documents = self.load(collection).await?;
        documents.push(document);
        self.persist(collection, &documents).await
    }

    async fn find_one(&self, collection: &str, predicate: &Predicate) -> Result<Option<Value>> {
        let _guard = self.guard.lock().await;

        let documents = self.load(collection).await?;
        Ok(documents.into_iter().find(|doc| predicate.matches(doc)))
    }

    async fn find_many(&self, collection: &str, predicate: &Predicate) -> Result<Vec<Value>> {
        let _guard = self.guard.lock().await;

        let documents = self.load(collection).await?;
        Ok(documents
            .into_iter()
            .filter(|doc| predicate.matches(doc))
            .collect())
    }

    async fn update(&self, collection: &str, predicate: &Predicate, patch: Value) -> Result<usize> {
        let _guard = self.guard.lock().await;

        let mut documents = self.load(collection).await?;
        let mut updated = 0;
        for document in documents.iter_mut().filter(|doc| predicate.matches(doc)) {
            apply_patch(document, &patch)?;
            updated += 1;
        }

        if updated > 0 {
            self.persist(collection, &documents).await?;
        }

        Ok(updated)
    }

    async fn delete(&self, collection: &str, predicate: &Predicate) -> Result<usize> {
        let _guard = self.guard.lock().await;

        let mut documents = self.load(collection).await?;
        let before = documents.len();
        documents.retain(|doc| !predicate.matches(doc));
        let deleted = before - documents.len();

        if deleted > 0 {
            self.persist(collection, &documents).await?;
        }

        Ok(deleted)
    }
}
