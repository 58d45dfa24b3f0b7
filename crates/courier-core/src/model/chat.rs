//! Chat records.
//!
//! The Bot API sends every chat as one flat object with a `type`
//! discriminator. [`RawChat`] mirrors that shape; [`Chat`] is the closed sum
//! type the rest of the framework works with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::user::User;

/// A chat a message was sent in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChat", into = "RawChat")]
pub enum Chat {
    /// One-on-one conversation. The chat id equals the user's id.
    Private(User),
    /// Group or supergroup.
    Group {
        /// Chat id.
        id: i64,
        /// Group title.
        title: Option<String>,
    },
    /// Broadcast channel.
    Channel {
        /// Chat id.
        id: i64,
        /// Channel title.
        title: Option<String>,
    },
}

impl Chat {
    /// Returns the stable chat id.
    pub fn id(&self) -> i64 {
        match self {
            Chat::Private(user) => user.id,
            Chat::Group { id, .. } | Chat::Channel { id, .. } => *id,
        }
    }

    /// Returns the chat title for groups and channels.
    pub fn title(&self) -> Option<&str> {
        match self {
            Chat::Private(_) => None,
            Chat::Group { title, .. } | Chat::Channel { title, .. } => title.as_deref(),
        }
    }

    /// Returns the counterpart of a private chat.
    pub fn user(&self) -> Option<&User> {
        match self {
            Chat::Private(user) => Some(user),
            _ => None,
        }
    }

    /// Returns `true` for private chats.
    pub fn is_private(&self) -> bool {
        matches!(self, Chat::Private(_))
    }
}

/// Returned when a chat carries a `type` this crate does not model.
#[derive(Debug, Clone, Error)]
#[error("unknown chat type '{0}'")]
pub struct UnknownChatType(pub String);

/// Flat wire representation of a chat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawChat {
    /// Chat id.
    pub id: i64,
    /// Type discriminator (`private`, `group`, `supergroup`, `channel`).
    #[serde(rename = "type")]
    pub chat_type: String,
    /// Title for groups and channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Username for private chats and public channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// First name of the private chat counterpart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name of the private chat counterpart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl TryFrom<RawChat> for Chat {
    type Error = UnknownChatType;

    fn try_from(raw: RawChat) -> Result<Self, Self::Error> {
        match raw.chat_type.as_str() {
            "private" => Ok(Chat::Private(User {
                id: raw.id,
                first_name: raw.first_name,
                last_name: raw.last_name,
                username: raw.username,
            })),
            "group" | "supergroup" => Ok(Chat::Group {
                id: raw.id,
                title: raw.title,
            }),
            "channel" => Ok(Chat::Channel {
                id: raw.id,
                title: raw.title,
            }),
            _ => Err(UnknownChatType(raw.chat_type)),
        }
    }
}

impl From<Chat> for RawChat {
    fn from(chat: Chat) -> Self {
        match chat {
            Chat::Private(user) => RawChat {
                id: user.id,
                chat_type: "private".into(),
                username: user.username,
                first_name: user.first_name,
                last_name: user.last_name,
                ..Default::default()
            },
            Chat::Group { id, title } => RawChat {
                id,
                chat_type: "group".into(),
                title,
                ..Default::default()
            },
            Chat::Channel { id, title } => RawChat {
                id,
                chat_type: "channel".into(),
                title,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_chat_id_is_user_id() {
        let chat: Chat =
            serde_json::from_str(r#"{"id": 99, "type": "private", "first_name": "Ann"}"#).unwrap();
        assert!(chat.is_private());
        assert_eq!(chat.id(), 99);
        assert_eq!(chat.user().map(|u| u.id), Some(99));
    }

    #[test]
    fn test_supergroup_is_group() {
        let chat: Chat =
            serde_json::from_str(r#"{"id": -100, "type": "supergroup", "title": "Rustaceans"}"#)
                .unwrap();
        assert_eq!(
            chat,
            Chat::Group {
                id: -100,
                title: Some("Rustaceans".into())
            }
        );
        assert_eq!(chat.title(), Some("Rustaceans"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = serde_json::from_str::<Chat>(r#"{"id": 1, "type": "forum"}"#);
        assert!(result.is_err());
    }
}
