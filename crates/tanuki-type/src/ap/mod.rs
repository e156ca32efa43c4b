use self::actor::Actor;
use iso8601_timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const PUBLIC_IDENTIFIER: &str = "https://www.w3.org/ns/activitystreams#Public";

pub mod actor;
pub mod collection;
pub mod object;

#[must_use]
pub fn ap_context() -> Value {
    json!([
        "https://www.w3.org/ns/activitystreams",
        "https://w3id.org/security/v1",
    ])
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum ActivityType {
    Accept,
    Create,
    Follow,
    Like,
    Reject,
    Undo,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ObjectField {
    Activity(Box<Activity>),
    Actor(Actor),
    Object(object::Object),
    Url(String),
}

impl ObjectField {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Activity(activity) => &activity.id,
            Self::Actor(actor) => &actor.id,
            Self::Object(object) => &object.id,
            Self::Url(url) => url,
        }
    }

    #[must_use]
    pub fn into_activity(self) -> Option<Box<Activity>> {
        if let Self::Activity(activity) = self {
            Some(activity)
        } else {
            None
        }
    }

    #[must_use]
    pub fn into_object(self) -> Option<object::Object> {
        if let Self::Object(object) = self {
            Some(object)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Activity {
    #[serde(
        default,
        rename = "@context",
        skip_serializing_if = "Value::is_null"
    )]
    pub context: Value,
    pub id: String,
    pub r#type: ActivityType,
    pub actor: String,
    pub object: ObjectField,
    #[serde(default = "Timestamp::now_utc")]
    pub published: Timestamp,
}

impl Activity {
    /// ID of the object the activity refers to
    #[must_use]
    pub fn object(&self) -> &str {
        self.object.id()
    }
}
