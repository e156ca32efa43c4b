use crate::{
    error::{Error, Result},
    local::LocalActorDocument,
    USERS_COLLECTION,
};
use http::HeaderValue;
use std::{sync::Arc, time::Duration};
use tanuki_core::{
    consts::{ACTIVITY_JSON, USER_AGENT},
    traits::Resolver,
};
use tanuki_db::{AnyStore, Predicate, StoreBackend};
use tanuki_http_client::Client;
use tanuki_type::ap::actor::Actor;
use tanuki_url::UrlService;
use typed_builder::TypedBuilder;
use url::Url;

/// Timeout for remote actor fetches
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Reference to an actor, as found in inbound activities or API calls
#[derive(Clone, Copy, Debug)]
pub enum ActorRef<'a> {
    /// Canonical actor URI
    Uri(&'a str),

    /// `username@domain` handle
    Handle { username: &'a str, domain: &'a str },

    /// Actor value the caller already holds
    Loaded(&'a Actor),
}

impl<'a> From<&'a str> for ActorRef<'a> {
    fn from(value: &'a str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            return Self::Uri(value);
        }

        if let Some((username, domain)) = value.trim_start_matches('@').split_once('@') {
            return Self::Handle { username, domain };
        }

        Self::Uri(value)
    }
}

/// Signing material of a local actor
#[derive(Clone, Debug)]
pub struct ActorKeys {
    /// ID of the published public key
    pub key_id: String,

    /// PKCS#8 PEM encoded private key
    pub private_key_pem: String,
}

fn default_client() -> Client {
    Client::builder()
        .default_header("Accept", HeaderValue::from_static(ACTIVITY_JSON))
        .unwrap()
        .user_agent(USER_AGENT)
        .unwrap()
        .timeout(FETCH_TIMEOUT)
        .build()
}

/// Resolves actor references to canonical actor documents
///
/// Local records always win; remote actors are discovered via WebFinger and
/// fetched over the federation transport. Remote documents are never written
/// into the local store, keeping local/remote provenance unambiguous.
#[derive(Clone, TypedBuilder)]
pub struct ActorDirectory {
    #[builder(default = default_client())]
    client: Client,
    resolver: Arc<dyn Resolver>,
    store: AnyStore,
    url_service: UrlService,
}

impl ActorDirectory {
    /// Resolve an actor reference
    ///
    /// Every failure mode collapses into [`Error::ActorUnresolvable`];
    /// federation errors are expected traffic and must stay recoverable.
    pub async fn resolve(&self, actor_ref: ActorRef<'_>) -> Result<Actor> {
        match actor_ref {
            ActorRef::Loaded(actor) => Ok(actor.clone()),
            ActorRef::Uri(uri) => {
                if let Some(actor) = self.local_actor_by_id(uri).await? {
                    return Ok(actor);
                }

                self.fetch_remote(uri).await
            }
            ActorRef::Handle { username, domain } => {
                if domain == self.url_service.domain() {
                    return self
                        .local_actor_by_username(username)
                        .await?
                        .ok_or(Error::ActorUnresolvable);
                }

                let resource = match self.resolver.resolve_account(username, domain).await {
                    Ok(Some(resource)) => resource,
                    Ok(None) => return Err(Error::ActorUnresolvable),
                    Err(error) => {
                        debug!(?error, username, domain, "webfinger resolution failed");
                        return Err(Error::ActorUnresolvable);
                    }
                };

                self.fetch_remote(&resource.uri).await
            }
        }
    }

    /// Look up a local actor by its canonical URI
    pub async fn local_actor_by_id(&self, id: &str) -> Result<Option<Actor>> {
        let document = self
            .store
            .find_one(USERS_COLLECTION, &Predicate::new().field("id", id))
            .await?;

        document
            .map(|doc| serde_json::from_value(doc).map_err(Error::from))
            .transpose()
    }

    /// Look up a local actor by its preferred username
    ///
    /// Never triggers a network call
    pub async fn local_actor_by_username(&self, username: &str) -> Result<Option<Actor>> {
        let document = self
            .store
            .find_one(
                USERS_COLLECTION,
                &Predicate::new().field("preferredUsername", username),
            )
            .await?;

        document
            .map(|doc| serde_json::from_value(doc).map_err(Error::from))
            .transpose()
    }

    /// Resolve the signing keys of a local actor
    ///
    /// The identifier is either the actor URI or a URI whose trailing path
    /// segment names a local user. Returns `None` when no local actor matches;
    /// this node never signs on behalf of remote actors, so callers treat an
    /// empty result as "cannot sign" rather than as an error.
    pub async fn signing_keys_for(&self, identifier: &str) -> Result<Option<ActorKeys>> {
        let mut document = self
            .store
            .find_one(USERS_COLLECTION, &Predicate::new().field("id", identifier))
            .await?;

        if document.is_none() {
            if let Some((_rest, username)) = identifier.rsplit_once('/') {
                document = self
                    .store
                    .find_one(
                        USERS_COLLECTION,
                        &Predicate::new().field("preferredUsername", username),
                    )
                    .await?;
            }
        }

        let Some(document) = document else {
            return Ok(None);
        };

        let document: LocalActorDocument = serde_json::from_value(document)?;
        let Some(auth) = document.auth else {
            return Ok(None);
        };

        Ok(Some(ActorKeys {
            key_id: document.actor.public_key.id,
            private_key_pem: auth.private_key,
        }))
    }

    async fn fetch_remote(&self, uri: &str) -> Result<Actor> {
        let response = match self.client.get(uri).await {
            Ok(response) => response,
            Err(error) => {
                debug!(?error, %uri, "remote actor fetch failed");
                return Err(Error::ActorUnresolvable);
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), %uri, "remote actor fetch failed");
            return Err(Error::ActorUnresolvable);
        }

        let Ok(actor) = response.json::<Actor>().await else {
            debug!(%uri, "malformed remote actor document");
            return Err(Error::ActorUnresolvable);
        };

        // The document has to originate from the host we fetched it from,
        // otherwise anyone could serve impersonated actor documents
        let (Ok(requested), Ok(advertised)) = (Url::parse(uri), Url::parse(&actor.id)) else {
            return Err(Error::ActorUnresolvable);
        };
        if requested.host_str() != advertised.host_str() {
            debug!(%uri, id = %actor.id, "actor document host mismatch");
            return Err(Error::ActorUnresolvable);
        }

        Ok(actor)
    }
}
