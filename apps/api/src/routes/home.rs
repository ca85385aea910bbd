use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Landing payload pointing clients at the public entry points.
pub async fn home_handler() -> Json<Value> {
    Json(json!({
        "service": "ginga",
        "links": {
            "jobs": "/jobs/",
            "signup": "/accounts/signup/",
            "login": "/accounts/login/",
            "dashboard": "/dashboard/"
        }
    }))
}
