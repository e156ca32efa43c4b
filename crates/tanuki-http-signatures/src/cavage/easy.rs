//!
//! Easy and fool-proof HTTP signature handling
//!
//! One-call signing and verification with opinionated defaults.
//!

use crate::{cavage::SignatureHeader, BoxError, SIGNATURE_HEADER};
use http::{
    header::{DATE, HOST},
    HeaderValue, Method, Request,
};
use std::{future::Future, time::SystemTime};
use thiserror::Error;
use tracing::debug;

const GET_HEADERS: &[&str] = &["host", "date"];
const POST_HEADERS: &[&str] = &["host", "date", "digest"];

/// Easy module error
#[derive(Debug, Error)]
pub enum Error {
    /// Couldn't get key from user-provided closure
    #[error(transparent)]
    GetKey(BoxError),

    /// Invalid HTTP header value (non UTF-8 value)
    #[error(transparent)]
    InvalidHeaderValue(#[from] http::header::ToStrError),

    /// Key failed to parse
    #[error(transparent)]
    InvalidKey(#[from] crate::crypto::parse::Error),

    /// Signature header parsing failed
    #[error(transparent)]
    InvalidSignatureHeader(#[from] super::ParseError),

    /// Request URI is missing the authority component
    #[error("Missing authority")]
    MissingAuthority,

    /// Signature header is missing
    #[error("Missing signature")]
    MissingSignature,

    /// Signature string construction failure
    #[error(transparent)]
    SignatureStringConstruction(#[from] super::signature_string::Error),

    /// Blocking task communication failure
    #[error(transparent)]
    TaskJoin(#[from] tokio::task::JoinError),

    /// Request failed the signature safety check
    #[error(transparent)]
    UnsafeRequest(#[from] super::SafetyCheckError),

    /// HTTP method is unsupported
    #[error("Unsupported HTTP method")]
    UnsupportedHttpMethod,

    /// Verification failed
    #[error(transparent)]
    Verify(#[from] crate::crypto::VerifyError),
}

/// Sign an HTTP request with the private key PEM using opinionated defaults
pub async fn sign<B>(
    mut req: Request<B>,
    key_id: &str,
    private_key_pem: &str,
) -> Result<Request<B>, Error>
where
    B: Send,
{
    let key = crate::crypto::parse::private_key(private_key_pem)?;

    // Set/overwrite the `Date` header; the signature has to cover the time it was created at
    let date_header_value =
        HeaderValue::from_str(&httpdate::fmt_http_date(SystemTime::now())).unwrap();
    req.headers_mut().insert(DATE, date_header_value);

    // hyper only fills in `Host` at transmission time, which is too late for signing
    if !req.headers().contains_key(HOST) {
        let authority = req.uri().authority().ok_or(Error::MissingAuthority)?;
        let host_value =
            HeaderValue::from_str(authority.as_str()).map_err(|_| Error::MissingAuthority)?;
        req.headers_mut().insert(HOST, host_value);
    }

    let headers = match *req.method() {
        Method::GET => GET_HEADERS.iter().copied(),
        Method::POST => POST_HEADERS.iter().copied(),
        _ => return Err(Error::UnsupportedHttpMethod),
    };

    let signature_header = SignatureHeader {
        key_id,
        headers,
        signature: (),
        created: None,
        expires: None,
    };

    debug_assert!(super::is_safe(&req, &signature_header).is_ok());

    let signature_string = super::signature_string::construct(&req, &signature_header)?;
    let signature =
        tokio::task::spawn_blocking(move || crate::crypto::sign(signature_string.as_bytes(), &key))
            .await?;

    let signature_header = SignatureHeader {
        key_id: signature_header.key_id,
        headers: signature_header.headers,
        signature: signature.as_str(),
        created: signature_header.created,
        expires: signature_header.expires,
    };

    let signature_header_value =
        HeaderValue::from_str(&super::serialise(signature_header)).unwrap();

    req.headers_mut()
        .insert(&SIGNATURE_HEADER, signature_header_value);

    Ok(req)
}

/// Verify an HTTP request using opinionated defaults
///
/// `get_key` resolves a key ID to the PEM-encoded public key it names
pub async fn verify<B, F, Fut, E>(req: &Request<B>, get_key: F) -> Result<(), Error>
where
    F: FnOnce(&str) -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: Into<BoxError>,
{
    let Some(header) = req.headers().get(&SIGNATURE_HEADER) else {
        debug!("Missing 'Signature' header");
        return Err(Error::MissingSignature);
    };

    let signature_header = super::parse(header.to_str()?)?;
    super::is_safe(req, &signature_header)?;

    let signature_string = super::signature_string::construct(req, &signature_header)?;
    let pem_key = get_key(signature_header.key_id)
        .await
        .map_err(|err| Error::GetKey(err.into()))?;

    let encoded_signature = signature_header.signature.to_string();
    let public_key = crate::crypto::parse::public_key(&pem_key)?;

    tokio::task::spawn_blocking(move || {
        crate::crypto::verify(signature_string.as_bytes(), &encoded_signature, &public_key)
    })
    .await??;

    Ok(())
}
