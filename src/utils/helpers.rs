use std::sync::OnceLock;

use actix_web::http::StatusCode;
use serde_json::{Value, json};

static SERVICE_NAME: OnceLock<String> = OnceLock::new();

/// Sets the name reported in every response envelope. Only the first call has an effect.
pub fn init_service_name(name: String) {
    let _ = SERVICE_NAME.set(name);
}

/// Name reported in every response envelope, `Unknown` until `init_service_name` runs.
pub fn service_name() -> &'static str {
    SERVICE_NAME.get().map(String::as_str).unwrap_or("Unknown")
}

/// Success envelope shared by all handlers; `payload` is merged into the top level.
pub fn success_body(message: &str, payload: Value) -> Value {
    let mut body = json!({
        "success": true,
        "message": message,
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": service_name(),
    });

    if let (Some(target), Value::Object(extra)) = (body.as_object_mut(), payload) {
        target.extend(extra);
    }

    body
}
