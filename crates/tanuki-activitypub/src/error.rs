use http::StatusCode;
use tanuki_error::ErrorType;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not resolve actor")]
    ActorUnresolvable,

    #[error("Delivery failed with status {status}")]
    DeliveryFailed { status: StatusCode },

    #[error(transparent)]
    Http(#[from] http::Error),

    #[error(transparent)]
    HttpClient(#[from] tanuki_http_client::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Invalid request signature")]
    SignatureInvalid,

    #[error(transparent)]
    Store(#[from] tanuki_db::Error),

    #[error("Target actor not found")]
    TargetNotFound,
}

impl Error {
    /// The response class this error maps onto
    ///
    /// Protocol-level faults are expected traffic and map to 4xx; anything
    /// infrastructure-shaped maps to 5xx.
    #[must_use]
    pub fn error_type(&self) -> ErrorType {
        match self {
            Self::ActorUnresolvable => {
                ErrorType::BadRequest(Some("could not resolve actor".into()))
            }
            Self::TargetNotFound => ErrorType::NotFound,
            Self::SignatureInvalid => ErrorType::Unauthorized,
            _ => ErrorType::Other(None),
        }
    }

    /// Convert into the shared error envelope, keeping the status mapping
    #[must_use]
    pub fn into_error(self) -> tanuki_error::Error {
        let ty = self.error_type();
        tanuki_error::Error::new(ty, self)
    }
}
