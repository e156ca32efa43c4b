use serde::{Deserialize, Serialize};
use tanuki_type::ap::actor::Actor;

/// Local actor document as persisted in the user collection
///
/// The auth record lives alongside the public actor fields but is logically
/// partitioned from them: external serialisation always goes through [`Actor`],
/// which has no `_auth` field, so credentials cannot leak into responses.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LocalActorDocument {
    #[serde(flatten)]
    pub actor: Actor,
    #[serde(rename = "_auth", default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthRecord>,
}

/// Credentials of a local actor
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AuthRecord {
    /// Argon2 PHC string; the salt is embedded in it
    pub password_hash: String,
    /// PKCS#8 PEM encoded private key
    pub private_key: String,
}
