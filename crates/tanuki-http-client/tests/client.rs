use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use std::convert::Infallible;
use tanuki_http_client::Client;
use tower::service_fn;

#[derive(Deserialize)]
struct Greeting {
    hello: String,
}

#[tokio::test]
async fn default_headers_and_json() {
    let service = service_fn(|req: Request<_>| async move {
        assert_eq!(
            req.headers()
                .get("user-agent")
                .and_then(|value| value.to_str().ok()),
            Some(tanuki_core::consts::USER_AGENT)
        );
        assert_eq!(
            req.headers()
                .get("accept")
                .and_then(|value| value.to_str().ok()),
            Some("application/activity+json")
        );

        Ok::<_, Infallible>(Response::new(Full::new(Bytes::from_static(
            br#"{ "hello": "world" }"#,
        ))))
    });

    let client = Client::builder()
        .default_header("Accept", "application/activity+json")
        .unwrap()
        .service(service);

    let response = client
        .get("https://remote.example/users/bob")
        .await
        .expect("Failed to execute request");
    let greeting: Greeting = response.json().await.expect("Failed to parse body");

    assert_eq!(greeting.hello, "world");
}

#[tokio::test]
async fn body_limit_enforced() {
    let service = service_fn(|_req: Request<_>| async move {
        let huge_body = vec![b'a'; 2048];
        Ok::<_, Infallible>(Response::new(Full::new(Bytes::from(huge_body))))
    });

    let client = Client::builder()
        .content_length_limit(1024)
        .service(service);

    let response = client
        .get("https://remote.example/users/bob")
        .await
        .expect("Failed to execute request");

    assert!(response.bytes().await.is_err());
}
