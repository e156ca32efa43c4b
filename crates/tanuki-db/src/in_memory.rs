//!
//! In-memory implementation of the [`StoreBackend`] trait
//!

use crate::{apply_patch, Predicate, Result, StoreBackend};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// In-memory store
///
/// Mainly useful for tests and throwaway instances
#[derive(Clone, Default)]
pub struct Store {
    collections: Arc<RwLock<HashMap<String, Vec<Value>>>>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreBackend for Store {
    async fn insert(&self, collection: &str, document: Value) -> Result<()> {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);

        Ok(())
    }

    async fn find_one(&self, collection: &str, predicate: &Predicate) -> Result<Option<Value>> {
        let collections = self.collections.read().await;
        let documents = collections
            .get(collection)
            .map_or(&[][..], |documents| documents.as_slice());

        Ok(documents.iter().find(|doc| predicate.matches(doc)).cloned())
    }

    async fn find_many(&self, collection: &str, predicate: &Predicate) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        let documents = collections
            .get(collection)
            .map_or(&[][..], |documents| documents.as_slice());

        Ok(documents
            .iter()
            .filter(|doc| predicate.matches(doc))
            .cloned()
            .collect())
    }

    async fn update(&self, collection: &str, predicate: &Predicate, patch: Value) -> Result<usize> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let mut updated = 0;
        for document in documents.iter_mut().filter(|doc| predicate.matches(doc)) {
            apply_patch(document, &patch)?;
            updated += 1;
        }

        Ok(updated)
    }

    async fn delete(&self, collection: &str, predicate: &Predicate) -> Result<usize> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = documents.len();
        documents.retain(|doc| !predicate.matches(doc));

        Ok(before - documents.len())
    }
}

#[cfg(test)]
mod test {
    use crate::{in_memory::Store, Predicate, StoreBackend};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn insert_find_update_delete() {
        let store = Store::new();

        store
            .insert("users", json!({ "id": "1", "preferredUsername": "kou" }))
            .await
            .unwrap();
        store
            .insert("users", json!({ "id": "2", "preferredUsername": "momiji" }))
            .await
            .unwrap();

        let by_username = Predicate::new().field("preferredUsername", "kou");
        let found = store.find_one("users", &by_username).await.unwrap().unwrap();
        assert_eq!(found["id"], "1");

        let updated = store
            .update("users", &by_username, json!({ "preferredUsername": "kitsu" }))
            .await
            .unwrap();
        assert_eq!(updated, 1);
        assert!(store
            .find_one("users", &by_username)
            .await
            .unwrap()
            .is_none());

        let all = store.find_many("users", &Predicate::new()).await.unwrap();
        assert_eq!(all.len(), 2);

        let deleted = store
            .delete("users", &Predicate::new().field("id", "2"))
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(
            store
                .find_many("users", &Predicate::new())
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
