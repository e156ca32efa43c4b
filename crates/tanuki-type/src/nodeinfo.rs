//!
//! Subset of the NodeInfo 2.1 schema this node publishes
//!

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    ActivityPub,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Software {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Services {
    pub inbound: Vec<String>,
    pub outbound: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Users {
    pub total: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Usage {
    pub users: Users,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoOne {
    pub version: String,
    pub software: Software,
    pub protocols: Vec<Protocol>,
    pub services: Services,
    pub open_registrations: bool,
    pub usage: Usage,
    pub metadata: Value,
}
