use crate::{
    deliverer::Deliverer,
    directory::{ActorDirectory, ActorRef},
    error::{Error, Result},
    mapping,
    relationship::{FollowState, RelationshipStore},
};
use async_trait::async_trait;
use std::sync::Arc;
use tanuki_type::ap::{actor::Actor, Activity, ActivityType, ObjectField};
use tanuki_url::UrlService;
use typed_builder::TypedBuilder;

/// Outcome of a follow policy evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyDecision {
    Accept,
    Reject,
    /// Queued for manual approval; currently treated like an accept until an
    /// approval queue exists
    Manual,
}

/// Decision point for inbound follow requests
///
/// Pluggable so blocklists or approval queues can slot in without touching
/// the state machine.
#[async_trait]
pub trait FollowPolicy: Send + Sync {
    async fn evaluate(&self, follower: &Actor, target: &Actor) -> PolicyDecision;
}

/// Policy that accepts every follow request from a resolvable actor
pub struct AcceptAll;

#[async_trait]
impl FollowPolicy for AcceptAll {
    async fn evaluate(&self, _follower: &Actor, _target: &Actor) -> PolicyDecision {
        PolicyDecision::Accept
    }
}

/// Orchestrates the follow protocol
///
/// Relationship state is committed before any delivery happens; the stored
/// record is the source of truth and delivery is best-effort.
#[derive(Clone, TypedBuilder)]
pub struct FollowService {
    directory: ActorDirectory,
    relationships: RelationshipStore,
    deliverer: Deliverer,
    #[builder(default = Arc::new(AcceptAll))]
    policy: Arc<dyn FollowPolicy>,
    url_service: UrlService,
}

impl FollowService {
    /// Handle an inbound Follow activity
    ///
    /// Resolves the sender, confirms the target is hosted here, transitions
    /// the relationship and answers with a signed Accept or Reject.
    pub async fn handle_follow(&self, activity: &Activity) -> Result<()> {
        // An unresolvable actor cannot be trusted; nothing is stored for it
        let follower = self.directory.resolve(ActorRef::Uri(&activity.actor)).await?;

        let target_id = activity.object();
        let Some(target) = self.directory.local_actor_by_id(target_id).await? else {
            return Err(Error::TargetNotFound);
        };

        self.relationships
            .upsert(&follower.id, &target.id, &activity.id, FollowState::Pending)
            .await?;

        let decision = self.policy.evaluate(&follower, &target).await;
        match decision {
            PolicyDecision::Accept | PolicyDecision::Manual => {
                self.relationships
                    .upsert(&follower.id, &target.id, &activity.id, FollowState::Accepted)
                    .await?;

                let accept = mapping::accept(&self.url_service, &target.id, activity.clone());
                self.dispatch(&target, &follower, &accept).await;
            }
            PolicyDecision::Reject => {
                self.relationships
                    .upsert(&follower.id, &target.id, &activity.id, FollowState::Rejected)
                    .await?;

                let reject = mapping::reject(&self.url_service, &target.id, activity.clone());
                self.dispatch(&target, &follower, &reject).await;
            }
        }

        Ok(())
    }

    /// Handle an inbound Accept answering one of our Follow requests
    pub async fn handle_accept(&self, activity: &Activity) -> Result<()> {
        if !self
            .relationships
            .set_status_by_id(activity.object(), FollowState::Accepted)
            .await?
        {
            debug!(follow_id = %activity.object(), "accept for unknown follow");
        }

        Ok(())
    }

    /// Handle an inbound Reject answering one of our Follow requests
    pub async fn handle_reject(&self, activity: &Activity) -> Result<()> {
        if !self
            .relationships
            .set_status_by_id(activity.object(), FollowState::Rejected)
            .await?
        {
            debug!(follow_id = %activity.object(), "reject for unknown follow");
        }

        Ok(())
    }

    /// Handle an inbound `Undo { Follow }`; the remote actor unfollowed us
    pub async fn handle_undo(&self, activity: &Activity) -> Result<()> {
        let ObjectField::Activity(inner) = &activity.object else {
            // Without the embedded Follow there is no pair to undo
            return Ok(());
        };

        if inner.r#type != ActivityType::Follow || inner.actor != activity.actor {
            return Ok(());
        }

        self.relationships
            .remove(&inner.actor, inner.object())
            .await
    }

    /// Follow a (usually remote) actor on behalf of a local one
    ///
    /// Returns the resolved target actor.
    pub async fn follow(&self, local: &Actor, target_ref: ActorRef<'_>) -> Result<Actor> {
        let target = self.directory.resolve(target_ref).await?;

        let follow = mapping::follow(&self.url_service, &local.id, &target.id);
        self.relationships
            .upsert(&local.id, &target.id, &follow.id, FollowState::Pending)
            .await?;

        self.dispatch(local, &target, &follow).await;

        Ok(target)
    }

    /// Withdraw a follow on behalf of a local actor
    pub async fn unfollow(&self, local: &Actor, target_ref: ActorRef<'_>) -> Result<()> {
        let target = self.directory.resolve(target_ref).await?;

        let Some(relationship) = self.relationships.get(&local.id, &target.id).await? else {
            return Ok(());
        };

        self.relationships.remove(&local.id, &target.id).await?;

        // Reconstruct the original Follow so the remote side can match it
        let mut follow = mapping::follow(&self.url_service, &local.id, &target.id);
        follow.id = relationship.id;

        let undo = mapping::undo(&self.url_service, &local.id, follow);
        self.dispatch(local, &target, &undo).await;

        Ok(())
    }

    /// Sign and deliver an activity, swallowing failures
    ///
    /// Local state is already committed at this point; a failed delivery must
    /// never unwind it.
    async fn dispatch(&self, signer: &Actor, recipient: &Actor, activity: &Activity) {
        let keys = match self.directory.signing_keys_for(&signer.id).await {
            Ok(Some(keys)) => keys,
            Ok(None) => {
                warn!(actor = %signer.id, "no signing keys, skipping delivery");
                return;
            }
            Err(error) => {
                error!(?error, actor = %signer.id, "failed to load signing keys");
                return;
            }
        };

        if let Err(error) = self
            .deliverer
            .deliver(&recipient.inbox, &keys, activity)
            .await
        {
            error!(?error, inbox = %recipient.inbox, "failed to deliver activity");
        }
    }
}
