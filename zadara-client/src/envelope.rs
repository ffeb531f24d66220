//! Normalization of the API's response envelopes.
//!
//! The API reports failures in several shapes. [`normalize`] checks them in
//! a fixed order and either returns the object (possibly with the async
//! status rewritten) or a uniform [`ClientError`].

use crate::error::{ClientError, Result};
use crate::types::Body;
use serde_json::Value;
use std::ops::RangeInclusive;

/// `response.status` values that long-running operations report while the
/// job is still queued.
pub const ASYNC_STATUS_RANGE: RangeInclusive<i64> = 0x4000_0000..=0x8000_0000;

/// Checks a decoded object for error envelopes.
///
/// With `apply_async_status_override`, a nonzero `response.status` inside
/// [`ASYNC_STATUS_RANGE`] is rewritten to `0` and treated as success.
pub fn normalize(mut body: Body, apply_async_status_override: bool) -> Result<Body> {
    if let Some(msg) = body.get("status-msg") {
        return Err(ClientError::General(text_of(msg)));
    }

    if let (Some(message), Some(status)) = (body.get("message"), body.get("status")) {
        if status.as_str() != Some("success") {
            return Err(ClientError::General(text_of(message)));
        }
    }

    let Some(response) = body.get_mut("response").and_then(Value::as_object_mut) else {
        return Ok(body);
    };

    if let Some(first) = response
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
    {
        let message = first.get("message").map(text_of).unwrap_or_else(|| text_of(first));
        return Err(ClientError::Api(message));
    }

    let Some(status) = response.get("status") else {
        return Ok(body);
    };

    if status_is_zero(status) {
        return Ok(body);
    }

    if apply_async_status_override
        && status.as_i64().is_some_and(|code| ASYNC_STATUS_RANGE.contains(&code))
    {
        tracing::debug!(status = %status, "Async status rewritten to 0");
        response.insert("status".to_string(), Value::from(0));
        return Ok(body);
    }

    let message = response
        .get("message")
        .or_else(|| response.get("status_msg"))
        .map(text_of)
        .unwrap_or_else(|| format!("status {status}"));
    Err(ClientError::Api(message))
}

fn status_is_zero(status: &Value) -> bool {
    match status {
        Value::Number(n) => n.as_i64() == Some(0) || n.as_f64() == Some(0.0),
        Value::String(s) => s.trim() == "0",
        _ => false,
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Body {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_success_passes_through() {
        let body = obj(json!({"response": {"status": 0, "raid_groups": []}}));
        assert_eq!(normalize(body.clone(), false).unwrap(), body);
    }

    #[test]
    fn test_plain_object_passes_through() {
        let body = obj(json!({"name": "x"}));
        assert_eq!(normalize(body.clone(), false).unwrap(), body);
    }

    #[test]
    fn test_status_msg_wins_over_response_errors() {
        let body = obj(json!({
            "status-msg": "x",
            "response": {"errors": [{"message": "y"}]}
        }));
        match normalize(body, false) {
            Err(ClientError::General(msg)) => assert_eq!(msg, "x"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_message_with_failed_status() {
        let body = obj(json!({"message": "bad key", "status": "error"}));
        assert!(matches!(normalize(body, false), Err(ClientError::General(m)) if m == "bad key"));
    }

    #[test]
    fn test_message_with_success_status_passes() {
        let body = obj(json!({"message": "ok", "status": "success"}));
        assert!(normalize(body, false).is_ok());
    }

    #[test]
    fn test_errors_raise_even_with_zero_status() {
        let body = obj(json!({"response": {"status": 0, "errors": [{"message": "boom"}]}}));
        assert!(matches!(normalize(body, false), Err(ClientError::Api(m)) if m == "boom"));
    }

    #[test]
    fn test_empty_errors_list_is_ignored() {
        let body = obj(json!({"response": {"status": 0, "errors": []}}));
        assert!(normalize(body, false).is_ok());
    }

    #[test]
    fn test_nonzero_status_uses_message_then_status_msg() {
        let body = obj(json!({"response": {"status": 5, "message": "m"}}));
        assert!(matches!(normalize(body, false), Err(ClientError::Api(m)) if m == "m"));

        let body = obj(json!({"response": {"status": 5, "status_msg": "sm"}}));
        assert!(matches!(normalize(body, false), Err(ClientError::Api(m)) if m == "sm"));
    }

    #[test]
    fn test_async_status_override() {
        let body = obj(json!({"response": {"status": 0x5000_0000_i64, "message": "queued"}}));

        let ok = normalize(body.clone(), true).unwrap();
        assert_eq!(ok["response"]["status"], json!(0));

        assert!(matches!(normalize(body, false), Err(ClientError::Api(m)) if m == "queued"));
    }

    #[test]
    fn test_async_override_bounds_are_inclusive() {
        for status in [0x4000_0000_i64, 0x8000_0000_i64] {
            let body = obj(json!({"response": {"status": status}}));
            assert!(normalize(body, true).is_ok());
        }
        let body = obj(json!({"response": {"status": 0x8000_0001_i64, "message": "m"}}));
        assert!(normalize(body, true).is_err());
    }
}
