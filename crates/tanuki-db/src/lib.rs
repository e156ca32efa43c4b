//!
//! Schema-less document store
//!
//! Collections of JSON documents, queryable by exact-match field conjunction.
//! The persistence engine behind it is deliberately generic; tanuki treats it
//! as an external collaborator and only relies on the operations below.
//!

use derive_more::From;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;

pub mod fs;
pub mod in_memory;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Document or patch is not a JSON object")]
    NotAnObject,
}

/// Conjunction of exact-match field equalities
#[derive(Clone, Debug, Default)]
pub struct Predicate {
    fields: Vec<(String, Value)>,
}

impl Predicate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn matches(&self, document: &Value) -> bool {
        self.fields
            .iter()
            .all(|(key, value)| document.get(key) == Some(value))
    }
}

fn apply_patch(document: &mut Value, patch: &Value) -> Result<()> {
    let (Some(document), Some(patch)) = (document.as_object_mut(), patch.as_object()) else {
        return Err(Error::NotAnObject);
    };

    for (key, value) in patch {
        document.insert(key.clone(), value.clone());
    }

    Ok(())
}

/// Trait abstraction over store backends
pub trait StoreBackend: Clone + Send + Sync {
    /// Insert a new document into a collection
    fn insert(
        &self,
        collection: &str,
        document: Value,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Find the first document matching the predicate
    fn find_one(
        &self,
        collection: &str,
        predicate: &Predicate,
    ) -> impl Future<Output = Result<Option<Value>>> + Send;

    /// Find every document matching the predicate
    fn find_many(
        &self,
        collection: &str,
        predicate: &Predicate,
    ) -> impl Future<Output = Result<Vec<Value>>> + Send;

    /// Shallow-merge the patch into every matching document
    ///
    /// Returns the amount of patched documents
    fn update(
        &self,
        collection: &str,
        predicate: &Predicate,
        patch: Value,
    ) -> impl Future<Output = Result<usize>> + Send;

    /// Delete every matching document
    ///
    /// Returns the amount of deleted documents
    fn delete(
        &self,
        collection: &str,
        predicate: &Predicate,
    ) -> impl Future<Output = Result<usize>> + Send;
}

/// Combined store enum for enum dispatch
#[derive(Clone, From)]
pub enum AnyStore {
    /// Flat-file backed store
    Fs(fs::Store),

    /// In-memory store
    InMemory(in_memory::Store),
}

impl StoreBackend for AnyStore {
    async fn insert(&self, collection: &str, document: Value) -> Result<()> {
        match self {
            Self::Fs(fs) => fs.insert(collection, document).await,
            Self::InMemory(mem) => mem.insert(collection, document).await,
        }
    }

    async fn find_one(&self, collection: &str, predicate: &Predicate) -> Result<Option<Value>> {
        match self {
            Self::Fs(fs) => fs.find_one(collection, predicate).await,
            Self::InMemory(mem) => mem.find_one(collection, predicate).await,
        }
    }

    async fn find_many(&self, collection: &str, predicate: &Predicate) -> Result<Vec<Value>> {
        match self {
            Self::Fs(fs) => fs.find_many(collection, predicate).await,
            Self::InMemory(mem) => mem.find_many(collection, predicate).await,
        }
    }

    async fn update(&self, collection: &str, predicate: &Predicate, patch: Value) -> Result<usize> {
        match self {
            Self::Fs(fs) => fs.update(collection, predicate, patch).await,
            Self::InMemory(mem) => mem.update(collection, predicate, patch).await,
        }
    }

    async fn delete(&self, collection: &str, predicate: &Predicate) -> Result<usize> {
        match self {
            Self::Fs(fs) => fs.delete(collection, predicate).await,
            Self::InMemory(mem) => mem.delete(collection, predicate).await,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Predicate;
    use serde_json::json;

    #[test]
    fn predicate_conjunction() {
        let doc = json!({
            "follower": "https://remote.example/users/bob",
            "following": "https://tanuki.example/users/alice",
            "status": "accepted",
        });

        let matching = Predicate::new()
            .field("follower", "https://remote.example/users/bob")
            .field("status", "accepted");
        assert!(matching.matches(&doc));

        let mismatched = Predicate::new()
            .field("follower", "https://remote.example/users/bob")
            .field("status", "pending");
        assert!(!mismatched.matches(&doc));

        let missing_field = Predicate::new().field("nonexistent", "value");
        assert!(!missing_field.matches(&doc));
    }
}
