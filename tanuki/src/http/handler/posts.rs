use crate::state::AppState;
use axum::{extract::State, routing, Json, Router};
use serde_json::{json, Value};
use tanuki_activitypub::POSTS_COLLECTION;
use tanuki_db::{Predicate, StoreBackend};
use tanuki_error::Result;

async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let posts = state
        .store
        .find_many(POSTS_COLLECTION, &Predicate::new())
        .await?;

    Ok(Json(json!({ "posts": posts })))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", routing::get(list))
}
