use crate::state::AppState;
use axum::{async_trait, extract::FromRequest};
use http::{HeaderMap, Request};
use sha2::{Digest, Sha256};
use tanuki_activitypub::{ActorRef, Error as ApError};
use tanuki_error::{tanuki_error, BoxError, Error, ErrorType};
use tanuki_http_signatures::cavage;
use tanuki_type::ap::{actor::Actor, Activity};

/// Upper bound for inbox payloads
const INBOX_BODY_LIMIT: usize = 1024 * 1024;

/// Parses the body into an activity and verifies digest plus HTTP signature
///
/// Guarantees that the activity is attributed to the actor whose key signed
/// the request; nothing downstream runs for a request that fails this.
pub struct SignedActivity(pub Actor, pub Activity);

#[async_trait]
impl FromRequest<AppState> for SignedActivity {
    type Rejection = Error;

    async fn from_request(
        req: axum::extract::Request,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();

        let bytes = axum::body::to_bytes(body, INBOX_BODY_LIMIT)
            .await
            .map_err(|err| Error::new(ErrorType::BadRequest(None), err))?;

        // The digest has to match before anything is interpreted
        verify_digest(&parts.headers, &bytes)?;

        let activity: Activity = serde_json::from_slice(&bytes)
            .map_err(|err| Error::new(ErrorType::BadRequest(None), err))?;

        let author = state
            .directory
            .resolve(ActorRef::Uri(&activity.actor))
            .await
            .map_err(ApError::into_error)?;

        let public_key = author.public_key.clone();
        let author_id = author.id.clone();
        let request = Request::from_parts(parts, ());

        cavage::easy::verify(&request, |key_id| {
            // Only the activity author's own key may authenticate the request;
            // any key merely known to us would allow attribution spoofing
            let result = if key_id == public_key.id && public_key.owner == author_id {
                Ok(public_key.public_key_pem.clone())
            } else {
                Err(BoxError::from("key does not belong to the activity author"))
            };

            async move { result }
        })
        .await
        .map_err(|error| {
            debug!(?error, "signature verification failed");
            ApError::SignatureInvalid.into_error()
        })?;

        Ok(Self(author, activity))
    }
}

fn verify_digest(headers: &HeaderMap, body: &[u8]) -> Result<(), Error> {
    let Some(digest_header) = headers.get("digest") else {
        return Err(tanuki_error!(
            type = ErrorType::Unauthorized,
            "missing digest header"
        ));
    };

    let Ok(digest_header) = digest_header.to_str() else {
        return Err(tanuki_error!(
            type = ErrorType::Unauthorized,
            "invalid digest header"
        ));
    };

    let Some(expected) = digest_header
        .strip_prefix("SHA-256=")
        .or_else(|| digest_header.strip_prefix("sha-256="))
    else {
        return Err(tanuki_error!(
            type = ErrorType::Unauthorized,
            "unsupported digest algorithm"
        ));
    };

    let actual = base64_simd::STANDARD.encode_to_string(Sha256::digest(body));
    if actual != expected {
        return Err(tanuki_error!(
            type = ErrorType::Unauthorized,
            "digest mismatch"
        ));
    }

    Ok(())
}
