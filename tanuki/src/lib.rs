#[macro_use]
extern crate tracing;

use self::{
    config::{Configuration, StorageConfiguration},
    service::user::UserService,
    state::AppState,
};
use std::sync::Arc;
use tanuki_activitypub::{ActorDirectory, Deliverer, FollowService, RelationshipStore};
use tanuki_db::AnyStore;
use tanuki_url::UrlService;
use tanuki_webfinger::Webfinger;

pub mod config;
pub mod http;
pub mod observability;
pub mod service;
pub mod state;

/// Construct the application state from the configuration
///
/// Everything with a handle on the store or the network lives in here;
/// components receive their collaborators explicitly at construction time.
pub async fn initialise_state(config: &Configuration) -> eyre::Result<AppState> {
    let store = match &config.storage {
        StorageConfiguration::Fs { data_dir } => {
            AnyStore::from(tanuki_db::fs::Store::create(data_dir).await?)
        }
        StorageConfiguration::InMemory => AnyStore::from(tanuki_db::in_memory::Store::new()),
    };

    let url_service = UrlService::builder()
        .scheme(config.url.scheme.as_str())
        .domain(config.url.domain.as_str())
        .build();

    let directory = ActorDirectory::builder()
        .resolver(Arc::new(Webfinger::new()))
        .store(store.clone())
        .url_service(url_service.clone())
        .build();

    let relationships = RelationshipStore::new(store.clone());

    let follow = FollowService::builder()
        .directory(directory.clone())
        .relationships(relationships.clone())
        .deliverer(Deliverer::default())
        .url_service(url_service.clone())
        .build();

    let user_service = UserService::builder()
        .store(store.clone())
        .url_service(url_service.clone())
        .build();

    Ok(AppState {
        directory,
        follow,
        relationships,
        store,
        url_service,
        user_service,
    })
}
