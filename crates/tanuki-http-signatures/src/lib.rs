//!
//! HTTP signature handling for federated requests
//!
//! Implements the cavage draft signature scheme with RSA PKCS#1 v1.5 and
//! SHA-256, the only scheme this node signs or accepts.
//!

use http::HeaderName;

pub mod cavage;
pub mod crypto;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

static SIGNATURE_HEADER: HeaderName = HeaderName::from_static("signature");
