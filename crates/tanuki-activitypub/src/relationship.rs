use crate::{error::Result, FOLLOWS_COLLECTION};
use iso8601_timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tanuki_db::{AnyStore, Predicate, StoreBackend};

/// Lifecycle status of a follow relationship
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FollowState {
    Pending,
    Accepted,
    Rejected,
}

impl FollowState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// Directed follow edge between two actors
///
/// The `id` is the URI of the originating Follow activity and serves as the
/// durable correlation handle for Accept/Reject responses.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRelationship {
    pub id: String,
    pub follower: String,
    pub following: String,
    pub status: FollowState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

type PairLocks = Mutex<HashMap<(String, String), Arc<tokio::sync::Mutex<()>>>>;

/// Persists follow relationships and answers membership queries
///
/// At most one document exists per `(follower, following)` pair; upserts of
/// the same pair are serialised through an in-process key lock so duplicate
/// Follow deliveries cannot race each other into double inserts.
#[derive(Clone)]
pub struct RelationshipStore {
    store: AnyStore,
    pair_locks: Arc<PairLocks>,
}

impl RelationshipStore {
    #[must_use]
    pub fn new(store: AnyStore) -> Self {
        Self {
            store,
            pair_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn pair_lock(&self, follower: &str, following: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.pair_locks.lock().unwrap();
        locks
            .entry((follower.to_string(), following.to_string()))
            .or_default()
            .clone()
    }

    /// Create or update the relationship document for a `(follower, following)` pair
    ///
    /// An existing pair only gets its `status` and `updatedAt` refreshed;
    /// repeated calls with the same status are idempotent.
    pub async fn upsert(
        &self,
        follower: &str,
        following: &str,
        activity_id: &str,
        status: FollowState,
    ) -> Result<()> {
        let lock = self.pair_lock(follower, following);
        let _guard = lock.lock().await;

        let predicate = Predicate::new()
            .field("follower", follower)
            .field("following", following);

        let existing = self.store.find_one(FOLLOWS_COLLECTION, &predicate).await?;
        if existing.is_some() {
            self.store
                .update(
                    FOLLOWS_COLLECTION,
                    &predicate,
                    json!({
                        "status": status.as_str(),
                        "updatedAt": Timestamp::now_utc(),
                    }),
                )
                .await?;
        } else {
            let now = Timestamp::now_utc();
            let relationship = FollowRelationship {
                id: activity_id.to_string(),
                follower: follower.to_string(),
                following: following.to_string(),
                status,
                created_at: now,
                updated_at: now,
            };

            self.store
                .insert(FOLLOWS_COLLECTION, serde_json::to_value(relationship)?)
                .await?;
        }

        Ok(())
    }

    /// Fetch the relationship document for a pair
    pub async fn get(
        &self,
        follower: &str,
        following: &str,
    ) -> Result<Option<FollowRelationship>> {
        let document = self
            .store
            .find_one(
                FOLLOWS_COLLECTION,
                &Predicate::new()
                    .field("follower", follower)
                    .field("following", following),
            )
            .await?;

        document
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .transpose()
    }

    /// All accepted followers of an actor
    pub async fn followers_of(&self, actor_id: &str) -> Result<Vec<String>> {
        let documents = self
            .store
            .find_many(
                FOLLOWS_COLLECTION,
                &Predicate::new()
                    .field("following", actor_id)
                    .field("status", FollowState::Accepted.as_str()),
            )
            .await?;

        Ok(documents
            .into_iter()
            .filter_map(|doc| Some(doc.get("follower")?.as_str()?.to_string()))
            .collect())
    }

    /// All actors an actor has an accepted follow towards
    pub async fn following_of(&self, actor_id: &str) -> Result<Vec<String>> {
        let documents = self
            .store
            .find_many(
                FOLLOWS_COLLECTION,
                &Predicate::new()
                    .field("follower", actor_id)
                    .field("status", FollowState::Accepted.as_str()),
            )
            .await?;

        Ok(documents
            .into_iter()
            .filter_map(|doc| Some(doc.get("following")?.as_str()?.to_string()))
            .collect())
    }

    /// Whether `follower` has an accepted follow towards `following`
    pub async fn is_following(&self, follower: &str, following: &str) -> Result<bool> {
        let document = self
            .store
            .find_one(
                FOLLOWS_COLLECTION,
                &Predicate::new()
                    .field("follower", follower)
                    .field("following", following)
                    .field("status", FollowState::Accepted.as_str()),
            )
            .await?;

        Ok(document.is_some())
    }

    /// Delete the relationship document for a pair
    ///
    /// Used by unfollow; the edge simply ceases to exist.
    pub async fn remove(&self, follower: &str, following: &str) -> Result<()> {
        self.store
            .delete(
                FOLLOWS_COLLECTION,
                &Predicate::new()
                    .field("follower", follower)
                    .field("following", following),
            )
            .await?;

        Ok(())
    }

    /// Update the status of the relationship created by the given Follow activity
    ///
    /// Used when a remote server answers one of our Follow requests.
    /// Returns whether a relationship matched the activity ID.
    pub async fn set_status_by_id(&self, activity_id: &str, status: FollowState) -> Result<bool> {
        let updated = self
            .store
            .update(
                FOLLOWS_COLLECTION,
                &Predicate::new().field("id", activity_id),
                json!({
                    "status": status.as_str(),
                    "updatedAt": Timestamp::now_utc(),
                }),
            )
            .await?;

        Ok(updated > 0)
    }
}

#[cfg(test)]
mod test {
    use super::{FollowState, RelationshipStore};
    use pretty_assertions::assert_eq;
    use tanuki_db::{in_memory, AnyStore, Predicate, StoreBackend};

    const BOB: &str = "https://remote.example/users/bob";
    const ALICE: &str = "https://tanuki.example/users/alice";
    const ACTIVITY: &str = "https://remote.example/activities/1";

    fn store() -> (AnyStore, RelationshipStore) {
        let store = AnyStore::from(in_memory::Store::new());
        (store.clone(), RelationshipStore::new(store))
    }

    #[tokio::test]
    async fn upsert_is_unique_per_pair() {
        let (raw, relationships) = store();

        relationships
            .upsert(BOB, ALICE, ACTIVITY, FollowState::Pending)
            .await
            .unwrap();
        relationships
            .upsert(BOB, ALICE, ACTIVITY, FollowState::Accepted)
            .await
            .unwrap();
        relationships
            .upsert(BOB, ALICE, ACTIVITY, FollowState::Accepted)
            .await
            .unwrap();

        let documents = raw.find_many("follows", &Predicate::new()).await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0]["status"], "accepted");
        assert_eq!(documents[0]["id"], ACTIVITY);
    }

    #[tokio::test]
    async fn is_following_tracks_status() {
        let (_raw, relationships) = store();

        relationships
            .upsert(BOB, ALICE, ACTIVITY, FollowState::Pending)
            .await
            .unwrap();
        assert!(!relationships.is_following(BOB, ALICE).await.unwrap());

        relationships
            .upsert(BOB, ALICE, ACTIVITY, FollowState::Accepted)
            .await
            .unwrap();
        assert!(relationships.is_following(BOB, ALICE).await.unwrap());

        relationships
            .upsert(BOB, ALICE, ACTIVITY, FollowState::Rejected)
            .await
            .unwrap();
        assert!(!relationships.is_following(BOB, ALICE).await.unwrap());
    }

    #[tokio::test]
    async fn membership_queries() {
        let (_raw, relationships) = store();

        relationships
            .upsert(BOB, ALICE, ACTIVITY, FollowState::Accepted)
            .await
            .unwrap();
        relationships
            .upsert(
                "https://other.example/users/carol",
                ALICE,
                "https://other.example/activities/9",
                FollowState::Pending,
            )
            .await
            .unwrap();

        let followers = relationships.followers_of(ALICE).await.unwrap();
        assert_eq!(followers, [BOB]);

        let following = relationships.following_of(BOB).await.unwrap();
        assert_eq!(following, [ALICE]);
    }

    #[tokio::test]
    async fn remove_deletes_the_edge() {
        let (raw, relationships) = store();

        relationships
            .upsert(BOB, ALICE, ACTIVITY, FollowState::Accepted)
            .await
            .unwrap();
        relationships.remove(BOB, ALICE).await.unwrap();

        assert!(!relationships.is_following(BOB, ALICE).await.unwrap());
        let documents = raw.find_many("follows", &Predicate::new()).await.unwrap();
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn set_status_by_activity_id() {
        let (_raw, relationships) = store();

        relationships
            .upsert(ALICE, BOB, ACTIVITY, FollowState::Pending)
            .await
            .unwrap();

        assert!(relationships
            .set_status_by_id(ACTIVITY, FollowState::Accepted)
            .await
            .unwrap());
        assert!(relationships.is_following(ALICE, BOB).await.unwrap());

        assert!(!relationships
            .set_status_by_id("https://unknown.example/activities/0", FollowState::Accepted)
            .await
            .unwrap());
    }
}
