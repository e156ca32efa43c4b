use iso8601_timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum ObjectType {
    Note,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    #[serde(
        default,
        rename = "@context",
        skip_serializing_if = "Value::is_null"
    )]
    pub context: Value,
    pub id: String,
    pub r#type: ObjectType,
    pub attributed_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub content: String,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default = "Timestamp::now_utc")]
    pub published: Timestamp,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
}
