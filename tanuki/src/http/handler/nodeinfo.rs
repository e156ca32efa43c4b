use crate::state::AppState;
use axum::{extract::State, routing, Json, Router};
use serde_json::json;
use tanuki_activitypub::USERS_COLLECTION;
use tanuki_core::consts::VERSION;
use tanuki_db::{Predicate, StoreBackend};
use tanuki_error::Result;
use tanuki_type::nodeinfo::{Protocol, Services, Software, TwoOne, Usage, Users};

async fn two_one(State(state): State<AppState>) -> Result<Json<TwoOne>> {
    let user_count = state
        .store
        .find_many(USERS_COLLECTION, &Predicate::new())
        .await?
        .len() as u64;

    Ok(Json(TwoOne {
        version: "2.1".to_string(),
        software: Software {
            name: "tanuki".to_string(),
            version: VERSION.to_string(),
        },
        protocols: vec![Protocol::ActivityPub],
        services: Services {
            inbound: Vec::new(),
            outbound: Vec::new(),
        },
        open_registrations: true,
        usage: Usage {
            users: Users { total: user_count },
        },
        metadata: json!({}),
    }))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/2.1", routing::get(two_one))
}
