use crate::{http::responder::ActivityPubJson, state::AppState};
use axum::extract::{Path, State};
use tanuki_activitypub::{Error as ApError, POSTS_COLLECTION};
use tanuki_db::{Predicate, StoreBackend};
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

    let posts = state
        .store
        .find_many(
            POSTS_COLLECTION,
            &Predicate::new().field("attributedTo", actor.id.as_str()),
        )
        .await?;

    Ok(ActivityPubJson(Collection {
        context: ap_context(),
        id: url_service.outbox_url(&username),
        r#type: CollectionType::OrderedCollection,
        total_items: posts.len() as u64,
        ordered_items: posts,
    }))
}
