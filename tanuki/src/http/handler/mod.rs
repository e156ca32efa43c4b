pub mod nodeinfo;
pub mod posts;
pub mod users;
pub mod well_known;
