#[macro_use]
extern crate tracing;

use crate::error::Result;
use async_trait::async_trait;
use http::{HeaderValue, StatusCode};
use tanuki_core::{
    consts::{JRD_JSON, USER_AGENT},
    traits::resolver::{AccountResource, Resolver},
    BoxError,
};
use tanuki_http_client::Client;
use tanuki_type::webfinger::Resource;
use std::time::Duration;

pub mod error;

/// Timeout for discovery requests; resolution latency has to stay predictable
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct Webfinger {
    client: Client,
}

impl Webfinger {
    #[must_use]
    pub fn new() -> Self {
        let client = Client::builder()
            .default_header("Accept", HeaderValue::from_static(JRD_JSON))
            .unwrap()
            .user_agent(USER_AGENT)
            .unwrap()
            .timeout(REQUEST_TIMEOUT)
            .build();

        Self::with_client(client)
    }

    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Resolve the `acct:{username}@{domain}` handle via WebFinger
    ///
    /// Returns the object ID of the ActivityPub actor behind the handle.
    /// `Ok(None)` means the remote server answered but doesn't know the
    /// handle (or doesn't expose an ActivityPub representation of it).
    #[instrument(skip(self))]
    pub async fn resolve(&self, username: &str, domain: &str) -> Result<Option<AccountResource>> {
        let webfinger_url =
            format!("https://{domain}/.well-known/webfinger?resource=acct:{username}@{domain}");
        let response = self.client.get(webfinger_url).await?;

        if matches!(response.status(), StatusCode::NOT_FOUND | StatusCode::GONE) {
            // Either the actor couldn't be found or the server doesn't support WebFinger
            return Ok(None);
        }
        if !response.status().is_success() {
            debug!(status = %response.status(), "unexpected webfinger response status");
            return Ok(None);
        }

        let Ok(resource) = response.json::<Resource>().await else {
            debug!("malformed JRD document");
            return Ok(None);
        };

        let Some(uri) = resource.links.into_iter().find_map(|link| {
            (link.rel == "self" && link.r#type.as_deref() == Some("application/activity+json"))
                .then_some(link.href?)
        }) else {
            return Ok(None);
        };

        Ok(Some(AccountResource {
            uri,
            username: username.to_string(),
            domain: domain.to_string(),
        }))
    }
}

impl Default for Webfinger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Resolver for Webfinger {
    async fn resolve_account(
        &self,
        username: &str,
        domain: &str,
    ) -> Result<Option<AccountResource>, BoxError> {
        self.resolve(username, domain).await.map_err(BoxError::from)
    }
}
