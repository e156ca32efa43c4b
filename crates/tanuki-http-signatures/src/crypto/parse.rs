//!
//! Parse cryptographic keys for use in the HTTP signature implementation
//!

use const_oid::db::rfc5912::RSA_ENCRYPTION;
use pkcs8::{Document, PrivateKeyInfo, SecretDocument, SubjectPublicKeyInfoRef};
use ring::signature::{RsaKeyPair, UnparsedPublicKey, RSA_PKCS1_2048_8192_SHA256};
use thiserror::Error;

/// Key parsing error
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed DER structure
    #[error(transparent)]
    Der(#[from] pkcs8::der::Error),

    /// Key rejected
    #[error(transparent)]
    KeyRejected(#[from] ring::error::KeyRejected),

    /// Malformed key
    #[error("Malformed key")]
    MalformedKey,

    /// Unknown key type
    #[error("Unknown key type")]
    UnknownKeyType,
}

/// Parse an RSA public key from its SPKI PEM form
#[inline]
pub fn public_key(pem: &str) -> Result<UnparsedPublicKey<Vec<u8>>, Error> {
    let (_pem_tag, document) = Document::from_pem(pem)?;
    let spki: SubjectPublicKeyInfoRef<'_> = document.decode_msg()?;

    if spki.algorithm.oid != RSA_ENCRYPTION {
        return Err(Error::UnknownKeyType);
    }

    let raw_bytes = spki
        .subject_public_key
        .as_bytes()
        .ok_or(Error::MalformedKey)?
        .to_vec();

    Ok(UnparsedPublicKey::new(&RSA_PKCS1_2048_8192_SHA256, raw_bytes))
}

/// Parse an RSA private key from its PKCS#8 PEM form
///
/// Uses constant-time PEM decoding and zeroizes temporary allocations.
/// Prefer this function over your own decoding logic.
#[inline]
pub fn private_key(pem: &str) -> Result<RsaKeyPair, Error> {
    let (_tag_line, document) = SecretDocument::from_pem(pem)?;
    let private_key_raw: PrivateKeyInfo<'_> = document.decode_msg()?;

    if private_key_raw.algorithm.oid != RSA_ENCRYPTION {
        return Err(Error::UnknownKeyType);
    }

    Ok(RsaKeyPair::from_der(private_key_raw.private_key)?)
}
