use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum CollectionType {
    OrderedCollection,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(rename = "@context")]
    pub context: Value,
    pub id: String,
    pub r#type: CollectionType,
    pub total_items: u64,
    pub ordered_items: Vec<Value>,
}
