//!
//! Construction of the activities this node emits
//!

use iso8601_timestamp::Timestamp;
use tanuki_type::ap::{ap_context, Activity, ActivityType, ObjectField};
use tanuki_url::UrlService;
use uuid::Uuid;

fn activity(url_service: &UrlService, r#type: ActivityType, actor: &str, object: ObjectField) -> Activity {
    Activity {
        context: ap_context(),
        id: url_service.activity_url(Uuid::now_v7()),
        r#type,
        actor: actor.to_string(),
        object,
        published: Timestamp::now_utc(),
    }
}

/// Follow activity from `actor` towards `object`
#[must_use]
pub fn follow(url_service: &UrlService, actor: &str, object: &str) -> Activity {
    activity(
        url_service,
        ActivityType::Follow,
        actor,
        ObjectField::Url(object.to_string()),
    )
}

/// Accept activity referencing the original Follow
#[must_use]
pub fn accept(url_service: &UrlService, actor: &str, followed: Activity) -> Activity {
    activity(
        url_service,
        ActivityType::Accept,
        actor,
        ObjectField::Activity(Box::new(followed)),
    )
}

/// Reject activity referencing the original Follow
#[must_use]
pub fn reject(url_service: &UrlService, actor: &str, followed: Activity) -> Activity {
    activity(
        url_service,
        ActivityType::Reject,
        actor,
        ObjectField::Activity(Box::new(followed)),
    )
}

/// Undo activity wrapping a previously emitted activity
#[must_use]
pub fn undo(url_service: &UrlService, actor: &str, object: Activity) -> Activity {
    activity(
        url_service,
        ActivityType::Undo,
        actor,
        ObjectField::Activity(Box::new(object)),
    )
}
