use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use iso8601_timestamp::Timestamp;
use rsa::{
    pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding},
    RsaPrivateKey,
};
use tanuki_activitypub::{
    local::{AuthRecord, LocalActorDocument},
    USERS_COLLECTION,
};
use tanuki_db::{AnyStore, Predicate, StoreBackend};
use tanuki_error::{bail, tanuki_error, ErrorType, Result};
use tanuki_type::ap::{
    actor::{Actor, ActorType, PublicKey},
    ap_context,
};
use tanuki_url::UrlService;
use typed_builder::TypedBuilder;

const RSA_KEY_SIZE: usize = 2048;

#[derive(Clone, TypedBuilder)]
pub struct Register {
    username: String,
    password: String,
    #[builder(default)]
    display_name: Option<String>,
    #[builder(default)]
    summary: Option<String>,
}

#[derive(Clone, TypedBuilder)]
pub struct UserService {
    store: AnyStore,
    url_service: UrlService,
}

impl UserService {
    /// Register a new local actor
    ///
    /// Generates the RSA keypair and password hash off the async executor,
    /// derives every URI through the URL service and persists the actor
    /// document together with its private auth record.
    pub async fn register(&self, register: Register) -> Result<Actor> {
        let existing = self
            .store
            .find_one(
                USERS_COLLECTION,
                &Predicate::new().field("preferredUsername", register.username.as_str()),
            )
            .await?;
        if existing.is_some() {
            bail!(
                type = ErrorType::BadRequest(Some("username already taken".into())),
                "username already taken"
            );
        }

        let password = register.password;
        let hashed_password_fut = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut rand::thread_rng());
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
        });
        let private_key_fut = tokio::task::spawn_blocking(|| {
            RsaPrivateKey::new(&mut rand::thread_rng(), RSA_KEY_SIZE)
        });

        let (hashed_password, private_key) = tokio::join!(hashed_password_fut, private_key_fut);
        let hashed_password = hashed_password??;
        let private_key = private_key??;

        let public_key_pem = private_key.as_ref().to_public_key_pem(LineEnding::LF)?;
        let private_key_pem = private_key.to_pkcs8_pem(LineEnding::LF)?.to_string();

        let username = register.username.as_str();
        let id = self.url_service.user_url(username);
        let actor = Actor {
            context: ap_context(),
            id: id.clone(),
            r#type: ActorType::Person,
            name: register.display_name,
            preferred_username: register.username.clone(),
            summary: register.summary,
            inbox: self.url_service.inbox_url(username),
            outbox: Some(self.url_service.outbox_url(username)),
            followers: Some(self.url_service.followers_url(username)),
            following: Some(self.url_service.following_url(username)),
            public_key: PublicKey {
                id: self.url_service.public_key_id(username),
                owner: id,
                public_key_pem,
            },
            published: Timestamp::now_utc(),
        };

        let document = LocalActorDocument {
            actor: actor.clone(),
            auth: Some(AuthRecord {
                password_hash: hashed_password,
                private_key: private_key_pem,
            }),
        };

        self.store
            .insert(USERS_COLLECTION, serde_json::to_value(document)?)
            .await?;

        Ok(actor)
    }

    /// Verify a local actor's credentials
    ///
    /// Token/session issuance is not handled here; callers only learn whether
    /// the credentials match and which actor they belong to.
    pub async fn login(&self, username: &str, password: &str) -> Result<Actor> {
        let invalid_credentials =
            || tanuki_error!(type = ErrorType::Unauthorized, "invalid credentials");

        let Some(document) = self
            .store
            .find_one(
                USERS_COLLECTION,
                &Predicate::new().field("preferredUsername", username),
            )
            .await?
        else {
            return Err(invalid_credentials());
        };

        let document: LocalActorDocument = serde_json::from_value(document)?;
        let Some(auth) = document.auth else {
            return Err(invalid_credentials());
        };

        let password = password.to_string();
        let valid = tokio::task::spawn_blocking(move || {
            let Ok(parsed) = PasswordHash::new(&auth.password_hash) else {
                return false;
            };

            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .await?;

        if !valid {
            return Err(invalid_credentials());
        }

        Ok(document.actor)
    }
}
