//!
//! Federation core: actor resolution, follow relationships and signed delivery
//!

#[macro_use]
extern crate tracing;

pub mod deliverer;
pub mod directory;
pub mod error;
pub mod follow;
pub mod local;
pub mod mapping;
pub mod relationship;

pub use self::deliverer::Deliverer;
pub use self::directory::{ActorDirectory, ActorKeys, ActorRef};
pub use self::error::{Error, Result};
pub use self::follow::{AcceptAll, FollowPolicy, FollowService, PolicyDecision};
pub use self::relationship::{FollowRelationship, FollowState, RelationshipStore};

/// Collection holding local actor documents
pub const USERS_COLLECTION: &str = "users";

/// Collection holding follow relationship documents
pub const FOLLOWS_COLLECTION: &str = "follows";

/// Collection holding ingested posts
pub const POSTS_COLLECTION: &str = "posts";

/// Collection holding like records
pub const LIKES_COLLECTION: &str = "likes";
