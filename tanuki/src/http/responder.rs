use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::header::CONTENT_TYPE;
use serde::Serialize;
use tanuki_core::consts::ACTIVITY_JSON;

/// JSON response with the ActivityPub media type
pub struct ActivityPubJson<T>(pub T);

impl<T> IntoResponse for ActivityPubJson<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        ([(CONTENT_TYPE, ACTIVITY_JSON)], Json(self.0)).into_response()
    }
}
