use crate::{http::extractor::SignedActivity, state::AppState};
use axum::extract::{Path, State};
use http::StatusCode;
use serde_json::json;
use tanuki_activitypub::{Error as ApError, LIKES_COLLECTION, POSTS_COLLECTION};
use tanuki_db::{Predicate, StoreBackend};
use tanuki_error::{bail, ErrorType, Result};
use tanuki_type::ap::{actor::Actor, Activity, ActivityType};

/// Inbox endpoint
///
/// The extractor has already authenticated the request; from here on the
/// activity is trusted to originate from `author`.
pub async fn post(
    State(state): State<AppState>,
    Path(username): Path<String>,
    SignedActivity(author, activity): SignedActivity,
) -> Result<StatusCode> {
    if state
        .directory
        .local_actor_by_username(&username)
        .await
        .map_err(ApError::into_error)?
        .is_none()
    {
        bail!(type = ErrorType::NotFound, "user not found");
    }

    match activity.r#type {
        ActivityType::Accept => state
            .follow
            .handle_accept(&activity)
            .await
            .map_err(ApError::into_error)?,
        ActivityType::Create => create_activity(&state, &author, activity).await?,
        ActivityType::Follow => state
            .follow
            .handle_follow(&activity)
            .await
            .map_err(ApError::into_error)?,
        ActivityType::Like => like_activity(&state, &author, &activity).await?,
        ActivityType::Reject => state
            .follow
            .handle_reject(&activity)
            .await
            .map_err(ApError::into_error)?,
        ActivityType::Undo => state
            .follow
            .handle_undo(&activity)
            .await
            .map_err(ApError::into_error)?,
    }

    Ok(StatusCode::ACCEPTED)
}

async fn create_activity(state: &AppState, author: &Actor, activity: Activity) -> Result<()> {
    let Some(object) = activity.object.into_object() else {
        // Only note objects are ingested
        return Ok(());
    };

    if object.attributed_to != author.id {
        bail!(
            type = ErrorType::BadRequest(Some("object not attributed to the signing actor".into())),
            "object not attributed to the signing actor"
        );
    }

    state
        .store
        .insert(POSTS_COLLECTION, serde_json::to_value(object)?)
        .await?;

    Ok(())
}

async fn like_activity(state: &AppState, author: &Actor, activity: &Activity) -> Result<()> {
    let liked_object_id = activity.object();

    let post = state
        .store
        .find_one(
            POSTS_COLLECTION,
            &Predicate::new().field("id", liked_object_id),
        )
        .await?;
    if post.is_none() {
        bail!(type = ErrorType::NotFound, "post not found");
    }

    state
        .store
        .insert(
            LIKES_COLLECTION,
            json!({
                "id": activity.id,
                "type": "Like",
                "actor": author.id,
                "object": liked_object_id,
                "published": activity.published,
            }),
        )
        .await?;

    Ok(())
}
