use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::convert::Infallible;
use tanuki_http_client::Client;
use tanuki_webfinger::Webfinger;
use tower::service_fn;

fn jrd_body() -> Bytes {
    let jrd = json!({
        "subject": "acct:bob@remote.example",
        "aliases": ["https://remote.example/@bob"],
        "links": [
            {
                "rel": "http://webfinger.net/rel/profile-page",
                "type": "text/html",
                "href": "https://remote.example/@bob"
            },
            {
                "rel": "self",
                "type": "application/activity+json",
                "href": "https://remote.example/users/bob"
            }
        ]
    });

    Bytes::from(jrd.to_string())
}

#[tokio::test]
async fn basic() {
    let client = service_fn(|req: Request<_>| async move {
        assert_eq!(
            req.uri().path_and_query().unwrap(),
            "/.well-known/webfinger?resource=acct:bob@remote.example"
        );

        Ok::<_, Infallible>(Response::new(Full::new(jrd_body())))
    });
    let client = Client::builder().service(client);

    let webfinger = Webfinger::with_client(client);
    let resource = webfinger
        .resolve("bob", "remote.example")
        .await
        .expect("Failed to fetch resource")
        .unwrap();

    assert_eq!(resource.username, "bob");
    assert_eq!(resource.domain, "remote.example");
    assert_eq!(resource.uri, "https://remote.example/users/bob");
}

#[tokio::test]
async fn missing_self_link() {
    let client = service_fn(|_req: Request<_>| async move {
        let jrd = json!({
            "subject": "acct:bob@remote.example",
            "links": [
                {
                    "rel": "http://webfinger.net/rel/profile-page",
                    "type": "text/html",
                    "href": "https://remote.example/@bob"
                }
            ]
        });

        Ok::<_, Infallible>(Response::new(Full::new(Bytes::from(jrd.to_string()))))
    });
    let client = Client::builder().service(client);

    let webfinger = Webfinger::with_client(client);
    let resource = webfinger
        .resolve("bob", "remote.example")
        .await
        .expect("Failed to fetch resource");

    assert!(resource.is_none());
}

#[tokio::test]
async fn unknown_handle() {
    let client = service_fn(|_req: Request<_>| async move {
        Ok::<_, Infallible>(
            Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Full::default())
                .unwrap(),
        )
    });
    let client = Client::builder().service(client);

    let webfinger = Webfinger::with_client(client);
    let resource = webfinger
        .resolve("unknown", "remote.example")
        .await
        .expect("Failed to fetch resource");

    assert!(resource.is_none());
}

#[tokio::test]
async fn malformed_document() {
    let client = service_fn(|_req: Request<_>| async move {
        Ok::<_, Infallible>(Response::new(Full::new(Bytes::from_static(
            b"definitely not a JRD document",
        ))))
    });
    let client = Client::builder().service(client);

    let webfinger = Webfinger::with_client(client);
    let resource = webfinger
        .resolve("bob", "remote.example")
        .await
        .expect("Failed to fetch resource");

    assert!(resource.is_none());
}
