use crate::{http::responder::ActivityPubJson, state::AppState};
use axum::extract::{Path, State};
use serde_json::Value;
use tanuki_activitypub::Error as ApError;
use tanuki_error::{bail, ErrorType, Result};
use tanuki_type::ap::{
    ap_context,
    collection::{Collection, CollectionType},
};
use tanuki_url::UrlService;

pub async fn get(
    State(state): State<AppState>,
    State(url_service): State<UrlService>,
    Path(username): Path<String>,
) -> Result<ActivityPubJson<Collection>> {
    let Some(actor) = state
        .directory
        .local_actor_by_username(&username)
        .await
        .map_err(ApError::into_error)?
    else {
        bail!(type = ErrorType::NotFound, "user not found");
    };

    let following = state
        .relationships
        .following_of(&actor.id)
        .await
        .map_err(ApError::into_error)?;

    Ok(ActivityPubJson(Collection {
        context: ap_context(),
        id: url_service.following_url(&username),
        r#type: CollectionType::OrderedCollection,
        total_items: following.len() as u64,
        ordered_items: following.into_iter().map(Value::String).collect(),
    }))
}
