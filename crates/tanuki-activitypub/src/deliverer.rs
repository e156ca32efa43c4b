use crate::{
    directory::ActorKeys,
    error::{Error, Result},
};
use http::{header::CONTENT_TYPE, Method, Request};
use sha2::{Digest, Sha256};
use tanuki_core::consts::{ACTIVITY_JSON, USER_AGENT};
use tanuki_http_client::{Body, Client};
use tanuki_type::ap::Activity;
use typed_builder::TypedBuilder;

fn default_client() -> Client {
    Client::builder().user_agent(USER_AGENT).unwrap().build()
}

/// Delivers activities to remote inboxes
///
/// Cheap to clone, no `Arc` wrapping required.
#[derive(Clone, TypedBuilder)]
pub struct Deliverer {
    #[builder(default = default_client())]
    client: Client,
}

impl Deliverer {
    /// Deliver the activity to an inbox
    ///
    /// The request is signed with the provided actor keys. Delivery is
    /// best-effort and retry-less; callers decide whether a failure matters.
    #[instrument(skip_all, fields(%inbox_url, activity_url = %activity.id))]
    pub async fn deliver(
        &self,
        inbox_url: &str,
        keys: &ActorKeys,
        activity: &Activity,
    ) -> Result<()> {
        let body = serde_json::to_string(activity)?;
        let body_digest = base64_simd::STANDARD.encode_to_string(Sha256::digest(body.as_bytes()));
        let digest_header = format!("SHA-256={body_digest}");

        let request = Request::builder()
            .method(Method::POST)
            .uri(inbox_url)
            .header(CONTENT_TYPE, ACTIVITY_JSON)
            .header("Digest", digest_header)
            .body(Body::from(body))?;

        let response = self
            .client
            .execute_signed(request, &keys.key_id, &keys.private_key_pem)
            .await?;

        debug!(status_code = %response.status(), "executed delivery request");
        if !response.status().is_success() {
            return Err(Error::DeliveryFailed {
                status: response.status(),
            });
        }

        Ok(())
    }
}

impl Default for Deliverer {
    fn default() -> Self {
        Self::builder().build()
    }
}
