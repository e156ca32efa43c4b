use crate::BoxError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Description of a resolved account
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AccountResource {
    /// The `self` link (the account's URI)
    pub uri: String,
    /// The username part of the `acct:` URI
    pub username: String,
    /// The host component of the `acct:` URI
    pub domain: String,
}

/// Resolve a `username@domain` handle to an account resource
#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    async fn resolve_account(
        &self,
        username: &str,
        domain: &str,
    ) -> Result<Option<AccountResource>, BoxError>;
}
