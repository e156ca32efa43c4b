use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use http::StatusCode;
use serde::Deserialize;
use tanuki_activitypub::{ActorRef, Error as ApError};
use tanuki_error::{bail, ErrorType, Result};

#[derive(Deserialize)]
pub struct RelationshipForm {
    /// Actor URI or `username@domain` handle
    target: String,
}

pub async fn follow(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(form): Json<RelationshipForm>,
) -> Result<StatusCode> {
    let Some(local) = state
        .directory
        .local_actor_by_username(&username)
        .await
        .map_err(ApError::into_error)?
    else {
        bail!(type = ErrorType::NotFound, "user not found");
    };

    state
        .follow
        .follow(&local, ActorRef::from(form.target.as_str()))
        .await
        .map_err(ApError::into_error)?;

    Ok(StatusCode::ACCEPTED)
}

pub async fn unfollow(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(form): Json<RelationshipForm>,
) -> Result<StatusCode> {
    let Some(local) = state
        .directory
        .local_actor_by_username(&username)
        .await
        .map_err(ApError::into_error)?
    else {
        bail!(type = ErrorType::NotFound, "user not found");
    };

    state
        .follow
        .unfollow(&local, ActorRef::from(form.target.as_str()))
        .await
        .map_err(ApError::into_error)?;

    Ok(StatusCode::ACCEPTED)
}
