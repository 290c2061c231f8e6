use std::io;

use fraudscope_client::{ClientError, SuccessEnvelope};
use serde::Serialize;
use serde_json::{Value, json};

const JSON_VERSION: &str = "v1";

/// `{ok, version, command, data}` plus `warnings` when any were raised.
pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    let mut payload = json!({
        "ok": true,
        "version": JSON_VERSION,
        "command": success.command,
        "data": success.data,
    });
    if !success.warnings.is_empty()
        && let Some(object) = payload.as_object_mut()
    {
        let warnings = serde_json::to_value(&success.warnings).map_err(io::Error::other)?;
        object.insert("warnings".to_string(), warnings);
    }
    serialize_json_pretty(&payload)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    let mut payload = json!({
        "error": {
            "code": error.code,
            "message": error.message,
            "recovery_steps": error.recovery_steps,
        }
    });
    if let Some(data) = &error.data
        && let Some(body) = payload.get_mut("error").and_then(Value::as_object_mut)
    {
        body.insert("data".to_string(), data.clone());
    }
    serialize_json_pretty(&payload)
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
