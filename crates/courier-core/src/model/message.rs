//! The classified message type.

use super::chat::Chat;
use super::command::Command;
use super::media::{File, Media, PictureSet};
use super::user::User;

/// What a message carries. Exactly one variant applies to every message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    /// Plain text that is not a command.
    Text { text: String },
    /// Text starting with `/`.
    Command(Command),
    /// A media payload with an optional caption.
    Media {
        media: Media,
        caption: Option<String>,
    },
    ChatTitleChanged { title: String },
    ChatPictureChanged { pictures: PictureSet },
    ChatPictureRemoved,
    UserJoined(User),
    UserLeft(User),
    GroupCreated,
}

/// A classified message.
///
/// Built from the wire representation by
/// [`RawMessage::classify`](super::raw::RawMessage::classify) or by hand with
/// [`Message::new`] and the `with_*` setters.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub message_id: i64,
    /// Absent for channel posts.
    pub sender: Option<User>,
    /// Unix time in seconds.
    pub timestamp: i64,
    pub chat: Chat,
    pub forwarded_from: Option<User>,
    pub forwarded_timestamp: Option<i64>,
    pub reply_to: Option<Box<Message>>,
    pub kind: MessageKind,
}

impl Message {
    pub fn new(message_id: i64, chat: Chat, kind: MessageKind) -> Self {
        Self {
            message_id,
            sender: None,
            timestamp: 0,
            chat,
            forwarded_from: None,
            forwarded_timestamp: None,
            reply_to: None,
            kind,
        }
    }

    pub fn with_sender(mut self, sender: User) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_forward(mut self, from: User, timestamp: i64) -> Self {
        self.forwarded_from = Some(from);
        self.forwarded_timestamp = Some(timestamp);
        self
    }

    pub fn with_reply_to(mut self, message: Message) -> Self {
        self.reply_to = Some(Box::new(message));
        self
    }

    /// Shorthand for the chat id replies should go to.
    pub fn chat_id(&self) -> i64 {
        self.chat.id()
    }

    /// Returns the text of a text message.
    ///
    /// Commands are not text messages; use [`as_command`](Self::as_command)
    /// or [`Command::raw`] for those.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_command(&self) -> Option<&Command> {
        match &self.kind {
            MessageKind::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    pub fn media(&self) -> Option<&Media> {
        match &self.kind {
            MessageKind::Media { media, .. } => Some(media),
            _ => None,
        }
    }

    pub fn caption(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::Media { caption, .. } => caption.as_deref(),
            _ => None,
        }
    }

    pub fn file(&self) -> Option<&File> {
        self.media().and_then(Media::as_file)
    }

    pub fn is_forwarded(&self) -> bool {
        self.forwarded_from.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::media::Location;

    fn group() -> Chat {
        Chat::Group {
            id: -5,
            title: None,
        }
    }

    #[test]
    fn test_accessors_follow_kind() {
        let text = Message::new(1, group(), MessageKind::Text { text: "hi".into() });
        assert_eq!(text.text(), Some("hi"));
        assert!(text.as_command().is_none());
        assert!(text.media().is_none());

        let cmd = Message::new(
            2,
            group(),
            MessageKind::Command(Command::parse("/go").unwrap()),
        );
        assert!(cmd.text().is_none());
        assert_eq!(cmd.as_command().map(Command::name), Some("go"));
    }

    #[test]
    fn test_media_caption_and_file() {
        let msg = Message::new(
            3,
            group(),
            MessageKind::Media {
                media: Media::Location(Location {
                    longitude: 1.0,
                    latitude: 2.0,
                }),
                caption: Some("here".into()),
            },
        );
        assert_eq!(msg.caption(), Some("here"));
        assert!(msg.file().is_none());
        assert_eq!(msg.chat_id(), -5);
    }

    #[test]
    fn test_builders() {
        let msg = Message::new(4, group(), MessageKind::GroupCreated)
            .with_sender(User::new(10))
            .with_timestamp(1_700_000_000)
            .with_forward(User::new(11), 1_600_000_000);
        assert_eq!(msg.sender.as_ref().map(|u| u.id), Some(10));
        assert!(msg.is_forwarded());
        assert_eq!(msg.forwarded_timestamp, Some(1_600_000_000));
    }
}
