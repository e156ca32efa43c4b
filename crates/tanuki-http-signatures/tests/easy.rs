use http::{HeaderValue, Method, Request};
use rsa::{
    pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding},
    RsaPrivateKey,
};
use std::{convert::Infallible, sync::OnceLock};
use tanuki_http_signatures::cavage::easy;

const KEY_ID: &str = "https://tanuki.example/users/kou#main-key";

fn keypair() -> &'static (String, String) {
    static KEYPAIR: OnceLock<(String, String)> = OnceLock::new();

    KEYPAIR.get_or_init(|| {
        let private_key =
            RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("Failed to generate key");
        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .expect("Failed to encode private key")
            .to_string();
        let public_pem = private_key
            .as_ref()
            .to_public_key_pem(LineEnding::LF)
            .expect("Failed to encode public key");

        (private_pem, public_pem)
    })
}

fn post_request() -> Request<()> {
    Request::builder()
        .method(Method::POST)
        .uri("https://remote.example/users/bob/inbox")
        .header(
            "Digest",
            "SHA-256=X48E9qOokqqrvdts8nOJRJN3OWDUoyWxBf7kbu9DBPE=",
        )
        .body(())
        .unwrap()
}

#[tokio::test]
async fn sign_then_verify_post() {
    let (private_pem, public_pem) = keypair();

    let signed = easy::sign(post_request(), KEY_ID, private_pem)
        .await
        .expect("Failed to sign request");

    assert!(signed.headers().contains_key("signature"));
    assert!(signed.headers().contains_key("host"));
    assert!(signed.headers().contains_key("date"));

    easy::verify(&signed, |key_id| {
        assert_eq!(key_id, KEY_ID);
        let pem = public_pem.clone();
        async move { Ok::<_, Infallible>(pem) }
    })
    .await
    .expect("Signature failed to verify");
}

#[tokio::test]
async fn sign_then_verify_get() {
    let (private_pem, public_pem) = keypair();

    let request = Request::builder()
        .method(Method::GET)
        .uri("https://remote.example/users/bob")
        .body(())
        .unwrap();

    let signed = easy::sign(request, KEY_ID, private_pem)
        .await
        .expect("Failed to sign request");

    easy::verify(&signed, |_key_id| {
        let pem = public_pem.clone();
        async move { Ok::<_, Infallible>(pem) }
    })
    .await
    .expect("Signature failed to verify");
}

#[tokio::test]
async fn tampered_header_fails_verification() {
    let (private_pem, public_pem) = keypair();

    let mut signed = easy::sign(post_request(), KEY_ID, private_pem)
        .await
        .expect("Failed to sign request");

    // Swap out the digest after signing; the covered value no longer matches
    signed.headers_mut().insert(
        "digest",
        HeaderValue::from_static("SHA-256=tampered+digest+value+AAAAAAAAAAAAAAAAAAA="),
    );

    let result = easy::verify(&signed, |_key_id| {
        let pem = public_pem.clone();
        async move { Ok::<_, Infallible>(pem) }
    })
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn missing_signature_header() {
    let result = easy::verify(&post_request(), |_key_id| async move {
        Ok::<_, Infallible>(String::new())
    })
    .await;

    assert!(result.is_err());
}
