use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use http::header::CONTENT_TYPE;
use serde::Deserialize;
use tanuki_activitypub::{ActorDirectory, Error as ApError};
use tanuki_core::consts::{ACTIVITY_JSON, JRD_JSON};
use tanuki_error::{bail, ErrorType, Result};
use tanuki_type::webfinger::{Link, Resource};
use tanuki_url::UrlService;

#[derive(Deserialize)]
pub struct WebfingerQuery {
    resource: String,
}

pub async fn get(
    State(directory): State<ActorDirectory>,
    State(url_service): State<UrlService>,
    Query(query): Query<WebfingerQuery>,
) -> Result<Response> {
    let handle = query.resource.trim_start_matches("acct:");
    let Some((username, domain)) = handle.split_once('@') else {
        bail!(
            type = ErrorType::BadRequest(Some("invalid resource".into())),
            "invalid resource"
        );
    };

    if domain != url_service.domain() {
        bail!(type = ErrorType::NotFound, "unknown domain");
    }

    let Some(actor) = directory
        .local_actor_by_username(username)
        .await
        .map_err(ApError::into_error)?
    else {
        bail!(type = ErrorType::NotFound, "user not found");
    };

    let resource = Resource {
        subject: url_service.acct_uri(username),
        aliases: vec![actor.id.clone()],
        links: vec![Link {
            rel: "self".to_string(),
            r#type: Some(ACTIVITY_JSON.to_string()),
            href: Some(actor.id),
        }],
    };

    Ok(([(CONTENT_TYPE, JRD_JSON)], Json(resource)).into_response())
}
