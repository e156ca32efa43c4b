use crate::service::user::UserService;
use axum::extract::FromRef;
use tanuki_activitypub::{ActorDirectory, FollowService, RelationshipStore};
use tanuki_db::AnyStore;
use tanuki_url::UrlService;

/// Application state
///
/// One context object instead of module-level singletons; handlers pull the
/// pieces they need out of it via `State`/`FromRef`, and tests assemble their
/// own instance around in-memory stores and mock transports.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub directory: ActorDirectory,
    pub follow: FollowService,
    pub relationships: RelationshipStore,
    pub store: AnyStore,
    pub url_service: UrlService,
    pub user_service: UserService,
}
