use super::SignatureHeader;
use http::{header::DATE, Method, Request};
use std::time::{Duration, SystemTime, SystemTimeError};
use thiserror::Error;

/// Maximum accepted skew between the signature date and our clock
///
/// Anything older counts as a possible replay and is rejected.
const MAX_ACCEPTED_SIGNATURE_AGE: Duration = Duration::from_secs(5 * 60);

const REQUIRED_GET_HEADERS: &[&str] = &["host"];
const REQUIRED_POST_HEADERS: &[&str] = &["host", "digest"];

#[derive(Debug, Error)]
pub enum SafetyCheckError {
    #[error(transparent)]
    InvalidDateHeader(#[from] httpdate::Error),

    #[error(transparent)]
    InvalidHeaderValue(#[from] http::header::ToStrError),

    #[error(transparent)]
    InvalidSystemTime(#[from] SystemTimeError),

    #[error("Missing required headers")]
    MissingRequiredHeaders,

    #[error("Signature expired")]
    SignatureExpired,

    #[error("Signature too old")]
    SignatureTooOld,

    #[error("Unsupported HTTP method")]
    UnsupportedHttpMethod,
}

#[inline]
fn is_subset<I>(left: &[I], right: &[I]) -> bool
where
    I: PartialEq,
{
    if left.len() <= right.len() {
        left.iter().all(|item| right.contains(item))
    } else {
        false
    }
}

pub fn is_safe<'a, B, I, S>(
    req: &Request<B>,
    signature_header: &SignatureHeader<'_, I, S>,
) -> Result<(), SafetyCheckError>
where
    I: Iterator<Item = &'a str> + Clone,
{
    let collected_headers = signature_header.headers.clone().collect::<Vec<&str>>();
    let is_subset = match *req.method() {
        Method::GET => is_subset(REQUIRED_GET_HEADERS, &collected_headers),
        Method::POST => is_subset(REQUIRED_POST_HEADERS, &collected_headers),
        _ => return Err(SafetyCheckError::UnsupportedHttpMethod),
    };

    if !is_subset {
        return Err(SafetyCheckError::MissingRequiredHeaders);
    }

    // The signature has to cover either `date` or `(created)`
    if !collected_headers.contains(&"date") && !collected_headers.contains(&"(created)") {
        return Err(SafetyCheckError::MissingRequiredHeaders);
    }

    if let Some(expires) = signature_header.expires {
        let expires_at = SystemTime::UNIX_EPOCH + Duration::from_secs(expires);
        if expires_at < SystemTime::now() {
            return Err(SafetyCheckError::SignatureExpired);
        }
    }

    if let Some(created) = signature_header.created {
        let created_at = SystemTime::UNIX_EPOCH + Duration::from_secs(created);
        if SystemTime::now().duration_since(created_at)? > MAX_ACCEPTED_SIGNATURE_AGE {
            return Err(SafetyCheckError::SignatureTooOld);
        }
    }

    if let Some(date_header) = req.headers().get(DATE) {
        let date_header_time = httpdate::parse_http_date(date_header.to_str()?)?;
        if SystemTime::now().duration_since(date_header_time)? > MAX_ACCEPTED_SIGNATURE_AGE {
            return Err(SafetyCheckError::SignatureTooOld);
        }
    }

    Ok(())
}
