use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MESSAGE_DOCTYPE;

/// Whitelisted method that flips the like flag of a document
pub const TOGGLE_LIKE_METHOD: &str = "frappe.desk.like.toggle_like";

/// Messages of a channel, newest last
pub const GET_MESSAGES_METHOD: &str = "raven.raven_messaging.doctype.raven_message.raven_message.get_messages";

/// Members of a channel keyed by user identity
pub const GET_CHANNEL_MEMBERS_METHOD: &str =
    "raven.raven_channel_management.doctype.raven_channel_member.raven_channel_member.get_channel_members";

/// Identities of users currently online
pub const GET_ACTIVE_USERS_METHOD: &str = "raven.api.user_availability.get_active_users";

/// Body for creating a `Raven Message Reaction` document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateReaction {
    pub reaction: String,
    pub user: String,
    pub message: String,
}

/// Direction of a like toggle, sent as `"Yes"` / `"No"`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LikeAction {
    Yes,
    No,
}

impl LikeAction {
    /// The action that inverts the current liked state
    pub fn inverse_of(liked: bool) -> Self {
        if liked { LikeAction::No } else { LikeAction::Yes }
    }
}

/// Arguments of `frappe.desk.like.toggle_like`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleLike {
    pub doctype: String,
    pub name: String,
    pub add: LikeAction,
}

impl ToggleLike {
    /// Toggle request for a message given whether it is currently liked
    pub fn for_message(name: &str, currently_liked: bool) -> Self {
        Self {
            doctype: MESSAGE_DOCTYPE.to_string(),
            name: name.to_string(),
            add: LikeAction::inverse_of(currently_liked),
        }
    }
}

/// Body for updating the text of a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditMessage {
    pub text: String,
}

/// Body for creating a `Raven Channel Member` document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddChannelMember {
    pub channel_id: String,
    pub user_id: String,
}

/// Frappe wraps method results in `{"message": ...}`
#[derive(Debug, Clone, Deserialize)]
pub struct MethodResponse<T> {
    pub message: T,
}

/// Resource endpoints wrap documents in `{"data": ...}`
#[derive(Debug, Clone, Deserialize)]
pub struct DocResponse<T> {
    pub data: T,
}

/// Error reported by the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (status {status})")]
pub struct FrappeError {
    pub status: u16,
    pub exc_type: Option<String>,
    pub message: String,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    exc_type: Option<String>,
    #[serde(default)]
    exception: Option<String>,
    #[serde(default, rename = "_server_messages")]
    server_messages: Option<String>,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ServerMessage {
    message: String,
}

impl FrappeError {
    /// Build an error from a failed response body.
    ///
    /// Prefers the user-facing `_server_messages`, then `exception`, then the
    /// exception type. Falls back to the raw body.
    pub fn from_body(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        let server_message = parsed
            .server_messages
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(|m| serde_json::from_str::<ServerMessage>(m).ok())
                    .map(|m| m.message)
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .filter(|m| !m.is_empty());

        let plain_message = parsed
            .message
            .as_ref()
            .and_then(|m| m.as_str())
            .map(str::to_string);

        let message = server_message
            .or(parsed.exception.clone())
            .or(plain_message)
            .or(parsed.exc_type.clone())
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "Request failed".to_string()
                } else {
                    trimmed.to_string()
                }
            });

        Self {
            status,
            exc_type: parsed.exc_type,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toggle_like_body() {
        let body = serde_json::to_value(ToggleLike::for_message("MSG1", false)).unwrap();
        assert_eq!(
            body,
            json!({"doctype": "Raven Message", "name": "MSG1", "add": "Yes"})
        );

        let body = serde_json::to_value(ToggleLike::for_message("MSG1", true)).unwrap();
        assert_eq!(body["add"], "No");
    }

    #[test]
    fn test_create_reaction_body() {
        let body = serde_json::to_value(CreateReaction {
            reaction: "🎉".to_string(),
            user: "u1".to_string(),
            message: "MSG1".to_string(),
        })
        .unwrap();
        assert_eq!(body, json!({"reaction": "🎉", "user": "u1", "message": "MSG1"}));
    }

    #[test]
    fn test_error_prefers_server_messages() {
        let inner = json!({"message": "Not permitted"}).to_string();
        let body = json!({
            "exc_type": "PermissionError",
            "_server_messages": serde_json::to_string(&vec![inner]).unwrap(),
        })
        .to_string();

        let err = FrappeError::from_body(403, &body);
        assert_eq!(err.message, "Not permitted");
        assert_eq!(err.exc_type.as_deref(), Some("PermissionError"));
        assert_eq!(err.to_string(), "Not permitted (status 403)");
    }

    #[test]
    fn test_error_falls_back_to_exc_type_and_body() {
        let err = FrappeError::from_body(417, r#"{"exc_type": "ValidationError"}"#);
        assert_eq!(err.message, "ValidationError");

        let err = FrappeError::from_body(502, "Bad Gateway");
        assert_eq!(err.message, "Bad Gateway");
        assert_eq!(err.exc_type, None);

        let err = FrappeError::from_body(500, "");
        assert_eq!(err.message, "Request failed");
    }

    #[test]
    fn test_method_response_envelope() {
        let response: MethodResponse<Vec<String>> =
            serde_json::from_str(r#"{"message": ["u1", "u2"]}"#).unwrap();
        assert_eq!(response.message, vec!["u1", "u2"]);
    }
}
