use crate::{
    http::responder::ActivityPubJson,
    service::user::{Register, UserService},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{self, post},
    Json, Router,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tanuki_activitypub::{ActorDirectory, Error as ApError};
use tanuki_error::{bail, ErrorType, Result};
use tanuki_type::ap::actor::Actor;

mod followers;
mod following;
mod inbox;
mod outbox;
mod relationships;

#[derive(Deserialize)]
struct RegisterForm {
    username: String,
    password: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    id: String,
    username: String,
}

async fn get(
    State(directory): State<ActorDirectory>,
    Path(username): Path<String>,
) -> Result<ActivityPubJson<Actor>> {
    let Some(actor) = directory
        .local_actor_by_username(&username)
        .await
        .map_err(ApError::into_error)?
    else {
        bail!(type = ErrorType::NotFound, "user not found");
    };

    Ok(ActivityPubJson(actor))
}

async fn create(
    State(user_service): State<UserService>,
    Json(form): Json<RegisterForm>,
) -> Result<Response> {
    let register = Register::builder()
        .username(form.username)
        .password(form.password)
        .display_name(form.display_name)
        .summary(form.summary)
        .build();

    let actor = user_service.register(register).await?;

    Ok((StatusCode::CREATED, ActivityPubJson(actor)).into_response())
}

async fn login(
    State(user_service): State<UserService>,
    Json(form): Json<LoginForm>,
) -> Result<Json<LoginResponse>> {
    let actor = user_service.login(&form.username, &form.password).await?;

    Ok(Json(LoginResponse {
        id: actor.id,
        username: actor.preferred_username,
    }))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/login", post(login))
        .route("/:username", routing::get(get))
        .route("/:username/followers", routing::get(followers::get))
        .route("/:username/following", routing::get(following::get))
        .route("/:username/inbox", post(inbox::post))
        .route("/:username/outbox", routing::get(outbox::get))
        .route("/:username/follow", post(relationships::follow))
        .route("/:username/unfollow", post(relationships::unfollow))
}
