use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use iso8601_timestamp::Timestamp;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::{convert::Infallible, sync::Arc};
use tanuki_activitypub::{
    local::{AuthRecord, LocalActorDocument},
    ActorDirectory, ActorRef, Error, USERS_COLLECTION,
};
use tanuki_db::{in_memory, AnyStore, StoreBackend};
use tanuki_http_client::{Body, Client};
use tanuki_type::ap::{
    actor::{Actor, ActorType, PublicKey},
    ap_context,
};
use tanuki_url::UrlService;
use tanuki_webfinger::Webfinger;
use tower::service_fn;

const DUMMY_PEM: &str = "-----BEGIN PUBLIC KEY-----\n-----END PUBLIC KEY-----\n";

fn url_service() -> UrlService {
    UrlService::builder()
        .scheme("https")
        .domain("tanuki.example")
        .build()
}

fn directory(client: Client, store: AnyStore) -> ActorDirectory {
    ActorDirectory::builder()
        .client(client.clone())
        .resolver(Arc::new(Webfinger::with_client(client)))
        .store(store)
        .url_service(url_service())
        .build()
}

/// Client whose transport panics; resolution must not touch the network
fn unreachable_client() -> Client {
    Client::builder().service(service_fn(|req: Request<Body>| async move {
        panic!("HTTP client hit unexpected route: {}", req.uri());

        #[allow(unreachable_code)]
        Ok::<Response<Full<Bytes>>, Infallible>(unreachable!())
    }))
}

async fn insert_local_actor(store: &AnyStore, username: &str) -> Actor {
    let url_service = url_service();
    let id = url_service.user_url(username);

    let actor = Actor {
        context: ap_context(),
        id: id.clone(),
        r#type: ActorType::Person,
        name: None,
        preferred_username: username.to_string(),
        summary: None,
        inbox: url_service.inbox_url(username),
        outbox: Some(url_service.outbox_url(username)),
        followers: Some(url_service.followers_url(username)),
        following: Some(url_service.following_url(username)),
        public_key: PublicKey {
            id: url_service.public_key_id(username),
            owner: id,
            public_key_pem: DUMMY_PEM.to_string(),
        },
        published: Timestamp::now_utc(),
    };

    let document = LocalActorDocument {
        actor: actor.clone(),
        auth: Some(AuthRecord {
            password_hash: String::new(),
            private_key: "local private key pem".to_string(),
        }),
    };

    store
        .insert(USERS_COLLECTION, serde_json::to_value(document).unwrap())
        .await
        .unwrap();

    actor
}

#[tokio::test]
async fn local_lookups_never_hit_the_network() {
    let store = AnyStore::from(in_memory::Store::new());
    let alice = insert_local_actor(&store, "alice").await;
    let directory = directory(unreachable_client(), store);

    let by_handle = directory
        .resolve(ActorRef::Handle {
            username: "alice",
            domain: "tanuki.example",
        })
        .await
        .unwrap();
    assert_eq!(by_handle.id, alice.id);

    let by_uri = directory.resolve(ActorRef::Uri(&alice.id)).await.unwrap();
    assert_eq!(by_uri.preferred_username, "alice");

    let missing = directory
        .resolve(ActorRef::Handle {
            username: "ghost",
            domain: "tanuki.example",
        })
        .await
        .unwrap_err();
    assert!(matches!(missing, Error::ActorUnresolvable));
}

#[tokio::test]
async fn remote_handle_resolution() {
    let service = service_fn(|req: Request<Body>| async move {
        let body = match req.uri().to_string().as_str() {
            "https://remote.example/.well-known/webfinger?resource=acct:bob@remote.example" => {
                json!({
                    "subject": "acct:bob@remote.example",
                    "links": [{
                        "rel": "self",
                        "type": "application/activity+json",
                        "href": "https://remote.example/users/bob",
                    }],
                })
            }
            "https://remote.example/users/bob" => json!({
                "id": "https://remote.example/users/bob",
                "type": "Person",
                "preferredUsername": "bob",
                "inbox": "https://remote.example/users/bob/inbox",
                "publicKey": {
                    "id": "https://remote.example/users/bob#main-key",
                    "owner": "https://remote.example/users/bob",
                    "publicKeyPem": DUMMY_PEM,
                },
            }),
            uri => panic!("HTTP client hit unexpected route: {uri}"),
        };

        Ok::<_, Infallible>(Response::new(Full::new(Bytes::from(body.to_string()))))
    });

    let store = AnyStore::from(in_memory::Store::new());
    let directory = directory(Client::builder().service(service), store);

    let bob = directory
        .resolve(ActorRef::Handle {
            username: "bob",
            domain: "remote.example",
        })
        .await
        .unwrap();

    assert_eq!(bob.id, "https://remote.example/users/bob");
    assert_eq!(bob.inbox, "https://remote.example/users/bob/inbox");
}

#[tokio::test]
async fn impersonated_document_is_rejected() {
    let service = service_fn(|req: Request<Body>| async move {
        assert_eq!(req.uri().to_string(), "https://remote.example/users/mallory");

        // Document claims to live on a different host
        let body = json!({
            "id": "https://tanuki.example/users/alice",
            "type": "Person",
            "preferredUsername": "alice",
            "inbox": "https://tanuki.example/users/alice/inbox",
            "publicKey": {
                "id": "https://tanuki.example/users/alice#main-key",
                "owner": "https://tanuki.example/users/alice",
                "publicKeyPem": DUMMY_PEM,
            },
        });

        Ok::<_, Infallible>(Response::new(Full::new(Bytes::from(body.to_string()))))
    });

    let store = AnyStore::from(in_memory::Store::new());
    let directory = directory(Client::builder().service(service), store);

    let error = directory
        .resolve(ActorRef::Uri("https://remote.example/users/mallory"))
        .await
        .unwrap_err();

    assert!(matches!(error, Error::ActorUnresolvable));
}

#[tokio::test]
async fn signing_keys_lookup() {
    let store = AnyStore::from(in_memory::Store::new());
    let alice = insert_local_actor(&store, "alice").await;
    let directory = directory(unreachable_client(), store);

    // Exact ID match
    let keys = directory
        .signing_keys_for(&alice.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(keys.key_id, alice.public_key.id);
    assert_eq!(keys.private_key_pem, "local private key pem");

    // Trailing path segment fallback
    let keys = directory
        .signing_keys_for("https://tanuki.example/some/prefix/alice")
        .await
        .unwrap();
    assert!(keys.is_some());

    // Remote identifiers yield no keys; this node never signs for them
    let keys = directory
        .signing_keys_for("https://remote.example/users/bob")
        .await
        .unwrap();
    assert!(keys.is_none());
}

#[tokio::test]
async fn actor_ref_parsing() {
    assert!(matches!(
        ActorRef::from("https://remote.example/users/bob"),
        ActorRef::Uri(_)
    ));
    assert!(matches!(
        ActorRef::from("bob@remote.example"),
        ActorRef::Handle {
            username: "bob",
            domain: "remote.example"
        }
    ));
    assert!(matches!(
        ActorRef::from("@bob@remote.example"),
        ActorRef::Handle { .. }
    ));
}
