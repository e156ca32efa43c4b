use axum::{extract::State, Json};
use serde_json::{json, Value};
use tanuki_url::UrlService;

pub async fn get(State(url_service): State<UrlService>) -> Json<Value> {
    Json(json!({
        "links": [{
            "rel": "http://nodeinfo.diaspora.software/ns/schema/2.1",
            "href": format!("{}/nodeinfo/2.1", url_service.base_url()),
        }],
    }))
}
