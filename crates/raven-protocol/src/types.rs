use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Doctype of chat messages on the backend
pub const MESSAGE_DOCTYPE: &str = "Raven Message";

/// Doctype of reaction records
pub const REACTION_DOCTYPE: &str = "Raven Message Reaction";

/// Doctype of channel records
pub const CHANNEL_DOCTYPE: &str = "Raven Channel";

/// Doctype of channel membership records
pub const CHANNEL_MEMBER_DOCTYPE: &str = "Raven Channel Member";

/// Message payload, discriminated by `message_type` on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "message_type")]
pub enum MessageContent {
    Text { text: String },
    File { file: String },
    Image { file: String },
    /// Message types this client does not render actions for
    #[serde(other)]
    Other,
}

/// A chat message as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Document name. Empty while the message has not been saved yet.
    #[serde(default)]
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default, with = "frappe_datetime")]
    pub creation: Option<NaiveDateTime>,
    #[serde(default, with = "int_bool")]
    pub is_continuation: bool,
    /// Serialized JSON array of users who liked (saved) the message
    #[serde(rename = "_liked_by", default, skip_serializing_if = "Option::is_none")]
    pub liked_by: Option<String>,
    #[serde(flatten)]
    pub content: MessageContent,
}

impl Message {
    /// The document name, or `None` for a message that was not persisted yet
    pub fn identifier(&self) -> Option<&str> {
        if self.name.is_empty() {
            None
        } else {
            Some(&self.name)
        }
    }

    /// Text payload, empty for non-text messages
    pub fn text(&self) -> &str {
        match &self.content {
            MessageContent::Text { text } => text,
            MessageContent::File { .. } | MessageContent::Image { .. } | MessageContent::Other => "",
        }
    }

    /// File URL, empty for messages without an attachment
    pub fn file(&self) -> &str {
        match &self.content {
            MessageContent::File { file } | MessageContent::Image { file } => file,
            MessageContent::Text { .. } | MessageContent::Other => "",
        }
    }

    pub fn is_owned_by(&self, user: &str) -> bool {
        self.owner == user
    }

    /// Users who liked this message
    pub fn liked_by_users(&self) -> Vec<String> {
        liked_by_users(self.liked_by.as_deref())
    }

    pub fn is_liked_by(&self, user: &str) -> bool {
        let users = self.liked_by_users();
        !users.is_empty() && users.iter().any(|u| u == user)
    }
}

/// Parse a serialized `_liked_by` value.
///
/// Missing, `null`, empty or malformed input all mean nobody liked the message.
/// Entries that are not strings are skipped.
pub fn liked_by_users(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str::<Option<Vec<serde_json::Value>>>(s).ok())
        .flatten()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| entry.as_str().map(str::to_string))
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChannelType {
    Public,
    Private,
    Open,
    Direct,
    #[serde(rename = "Self")]
    SelfChannel,
    #[serde(other)]
    Other,
}

impl ChannelType {
    /// Only public and private channels accept new members
    pub fn can_add_members(self) -> bool {
        matches!(self, ChannelType::Public | ChannelType::Private)
    }
}

/// Channel data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelData {
    pub name: String,
    #[serde(default)]
    pub channel_name: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    #[serde(default)]
    pub channel_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelMember {
    /// User identity
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub user_image: Option<String>,
}

impl ChannelMember {
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }
}

/// Channel members keyed by user identity
pub type ChannelMembers = HashMap<String, ChannelMember>;

/// Frappe stores timestamps as `2023-04-10 12:00:00.123456`
mod frappe_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) if !s.is_empty() => NaiveDateTime::parse_from_str(&s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

/// Frappe check fields come back as 0/1
mod int_bool {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrBool {
        Int(i64),
        Bool(bool),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Option::<IntOrBool>::deserialize(deserializer)? {
            Some(IntOrBool::Int(v)) => v != 0,
            Some(IntOrBool::Bool(v)) => v,
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_message(liked_by: serde_json::Value) -> Message {
        serde_json::from_value(json!({
            "name": "MSG1",
            "owner": "u1",
            "channel_id": "general",
            "creation": "2023-04-10 12:00:00.123456",
            "is_continuation": 0,
            "message_type": "Text",
            "text": "hi",
            "file": null,
            "_liked_by": liked_by,
        }))
        .unwrap()
    }

    #[test]
    fn test_text_message_payload() {
        let message = text_message(json!("[]"));
        assert_eq!(message.text(), "hi");
        assert_eq!(message.file(), "");
        assert_eq!(message.identifier(), Some("MSG1"));
        assert!(!message.is_continuation);
        assert!(message.creation.is_some());
    }

    #[test]
    fn test_file_and_image_payload() {
        for kind in ["File", "Image"] {
            let message: Message = serde_json::from_value(json!({
                "name": "MSG2",
                "owner": "u1",
                "message_type": kind,
                "file": "/files/a.png",
                "text": null,
                "is_continuation": 1,
            }))
            .unwrap();
            assert_eq!(message.file(), "/files/a.png");
            assert_eq!(message.text(), "");
            assert!(message.is_continuation);
        }
    }

    #[test]
    fn test_unknown_message_type_has_no_payload() {
        let message: Message = serde_json::from_value(json!({
            "name": "MSG3",
            "owner": "u1",
            "message_type": "Poll",
        }))
        .unwrap();
        assert_eq!(message.content, MessageContent::Other);
        assert_eq!(message.text(), "");
        assert_eq!(message.file(), "");
    }

    #[test]
    fn test_unsaved_message_has_no_identifier() {
        let message: Message = serde_json::from_value(json!({
            "owner": "u1",
            "message_type": "Text",
            "text": "pending",
        }))
        .unwrap();
        assert_eq!(message.identifier(), None);
    }

    #[test]
    fn test_liked_by_fallbacks() {
        assert!(liked_by_users(None).is_empty());
        assert!(liked_by_users(Some("")).is_empty());
        assert!(liked_by_users(Some("null")).is_empty());
        assert!(liked_by_users(Some("[]")).is_empty());
        assert!(liked_by_users(Some("{not json")).is_empty());
        assert!(liked_by_users(Some("[1, 2]")).is_empty());
        assert_eq!(liked_by_users(Some(r#"["u1","u2"]"#)), vec!["u1", "u2"]);
        assert!(liked_by_users(Some(r#"{"u1": true}"#)).is_empty());
    }

    #[test]
    fn test_liked_by_skips_non_string_entries() {
        assert_eq!(liked_by_users(Some(r#"["u1", 5, null, "u2"]"#)), vec!["u1", "u2"]);
        assert!(text_message(json!(r#"["u1", 5]"#)).is_liked_by("u1"));
    }

    #[test]
    fn test_is_liked_by() {
        assert!(!text_message(json!(null)).is_liked_by("u1"));
        assert!(!text_message(json!("")).is_liked_by("u1"));
        assert!(!text_message(json!("[]")).is_liked_by("u1"));
        assert!(text_message(json!(r#"["u1"]"#)).is_liked_by("u1"));
        assert!(!text_message(json!(r#"["u2"]"#)).is_liked_by("u1"));
    }

    #[test]
    fn test_channel_types() {
        let channel: ChannelData = serde_json::from_value(json!({
            "name": "general",
            "channel_name": "General",
            "type": "Public",
        }))
        .unwrap();
        assert!(channel.channel_type.can_add_members());

        let private: ChannelType = serde_json::from_value(json!("Private")).unwrap();
        assert!(private.can_add_members());

        for other in ["Open", "Direct", "Self", "Archived"] {
            let kind: ChannelType = serde_json::from_value(json!(other)).unwrap();
            assert!(!kind.can_add_members(), "{other} should not accept members");
        }
    }

    #[test]
    fn test_member_display_name_falls_back_to_identity() {
        let member = ChannelMember {
            name: "u1@example.com".to_string(),
            full_name: String::new(),
            user_image: None,
        };
        assert_eq!(member.display_name(), "u1@example.com");
    }
}
