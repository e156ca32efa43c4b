/// Version of the tanuki project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent sent on every outbound federation request
pub const USER_AGENT: &str = concat!("tanuki/", env!("CARGO_PKG_VERSION"));

/// Media type of ActivityPub documents
pub const ACTIVITY_JSON: &str = "application/activity+json";

/// Media type of WebFinger JRD documents
pub const JRD_JSON: &str = "application/jrd+json";
