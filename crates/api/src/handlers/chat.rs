//! Handler for `/api/chat`: proxy to the chat automation webhook.
//!
//! The upstream automation is free-form about its reply shape, so the proxy
//! normalizes whatever JSON comes back into a single `{ reply }` string.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use motoshop_core::messages::CHAT_FALLBACK_REPLY;
use motoshop_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    pub user_id: Option<DbId>,
    pub username: Option<String>,
}

/// Keys the automation is known to answer under, in priority order.
const REPLY_KEYS: [&str; 5] = ["reply", "text", "output", "message", "answer"];

/// Extract a human-readable reply from an arbitrary webhook response.
///
/// Tries, in order: the well-known reply keys; the first element of an
/// array response (same keys); the first non-empty string value in the
/// object; and finally the raw JSON as a string.
fn extract_reply(data: &Value) -> String {
    fn known_key(obj: &Value) -> Option<String> {
        REPLY_KEYS
            .iter()
            .find_map(|key| obj.get(key).and_then(Value::as_str))
            .map(str::to_string)
    }

    if let Some(reply) = known_key(data) {
        return reply;
    }
    if let Some(first) = data.as_array().and_then(|items| items.first()) {
        if let Some(reply) = known_key(first) {
            return reply;
        }
    }
    if let Some(obj) = data.as_object() {
        let first_string = obj
            .values()
            .find_map(|v| v.as_str().filter(|s| !s.is_empty()));
        if let Some(reply) = first_string {
            return reply.to_string();
        }
    }
    match data {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// POST /api/chat (public)
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> AppResult<Json<Value>> {
    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::BadRequest("Message is required".into()))?;

    if !state.automation.has_chat_webhook() {
        tracing::warn!("chat webhook is not configured, returning fallback reply");
        return Ok(Json(json!({ "reply": CHAT_FALLBACK_REPLY })));
    }

    let data = state
        .automation
        .send_chat(message, req.user_id, req.username.as_deref())
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "chat webhook call failed");
            AppError::Upstream("Failed to communicate with AI service".into())
        })?;

    Ok(Json(json!({ "reply": extract_reply(&data) })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_well_known_keys_in_order() {
        let data = json!({ "answer": "second", "reply": "first" });
        assert_eq!(extract_reply(&data), "first");

        let data = json!({ "output": "from output" });
        assert_eq!(extract_reply(&data), "from output");
    }

    #[test]
    fn falls_back_to_first_array_element() {
        let data = json!([{ "text": "array reply" }, { "text": "ignored" }]);
        assert_eq!(extract_reply(&data), "array reply");
    }

    #[test]
    fn falls_back_to_first_string_value() {
        let data = json!({ "confidence": 0.9, "generated": "loose reply" });
        assert_eq!(extract_reply(&data), "loose reply");
    }

    #[test]
    fn falls_back_to_raw_json() {
        let data = json!({ "code": 42 });
        assert_eq!(extract_reply(&data), r#"{"code":42}"#);
    }

    #[test]
    fn bare_string_passes_through_unquoted() {
        let data = json!("plain string");
        assert_eq!(extract_reply(&data), "plain string");
    }
}
