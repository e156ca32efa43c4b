use crate::state::AppState;
use axum::{routing, Router};

mod nodeinfo;
mod webfinger;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/nodeinfo", routing::get(nodeinfo::get))
        .route("/webfinger", routing::get(webfinger::get))
}
