//! Wire representation of a message and its classification.
//!
//! The Bot API sends a message as one flat object where the variant is given
//! by whichever optional field is present. [`RawMessage`] keeps every marker
//! optional so deserialization never fails on an unfamiliar shape, and
//! [`RawMessage::classify`] turns it into a [`Message`] with exactly one
//! [`MessageKind`].

use serde::Deserialize;

use super::chat::{Chat, RawChat};
use super::command::Command;
use super::media::{Audio, Contact, Document, File, Location, Media, PictureSet, Sticker, Video, Voice};
use super::message::{Message, MessageKind};
use super::user::User;

/// A message exactly as the Bot API sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMessage {
    pub message_id: i64,
    pub from: Option<User>,
    pub date: i64,
    pub chat: RawChat,
    pub forward_from: Option<User>,
    pub forward_date: Option<i64>,
    pub reply_to_message: Option<Box<RawMessage>>,

    pub text: Option<String>,
    pub caption: Option<String>,

    pub audio: Option<Audio>,
    pub video: Option<Video>,
    pub document: Option<Document>,
    pub photo: Option<PictureSet>,
    pub sticker: Option<Sticker>,
    pub voice: Option<Voice>,
    pub contact: Option<Contact>,
    pub location: Option<Location>,

    pub new_chat_participant: Option<User>,
    pub new_chat_members: Option<Vec<User>>,
    pub left_chat_participant: Option<User>,
    pub left_chat_member: Option<User>,
    pub new_chat_title: Option<String>,
    pub new_chat_photo: Option<PictureSet>,
    pub delete_chat_photo: bool,
    pub group_chat_created: bool,
    pub supergroup_chat_created: bool,
    pub channel_chat_created: bool,
}

impl RawMessage {
    /// Classifies the payload.
    ///
    /// Markers are checked in a fixed order and the first one present wins:
    /// text (or command), audio, video, document, photo, sticker, voice,
    /// contact, location, joined user, left user, new title, new chat photo,
    /// deleted chat photo, chat creation.
    ///
    /// Returns `None` when no marker is present or the chat type is unknown.
    /// A reply that cannot be classified is dropped without failing the
    /// message itself.
    pub fn classify(self) -> Option<Message> {
        let chat = match Chat::try_from(self.chat) {
            Ok(chat) => chat,
            Err(e) => {
                tracing::trace!(message_id = self.message_id, error = %e, "Unclassifiable chat");
                return None;
            }
        };

        let caption = self.caption;
        let media = |media: Media| MessageKind::Media {
            media,
            caption: caption.clone(),
        };

        let kind = if let Some(text) = self.text {
            match Command::parse(&text) {
                Some(cmd) => MessageKind::Command(cmd),
                None => MessageKind::Text { text },
            }
        } else if let Some(audio) = self.audio {
            media(Media::File(File::Audio(audio)))
        } else if let Some(video) = self.video {
            media(Media::File(File::Video(video)))
        } else if let Some(document) = self.document {
            media(Media::File(File::Document(document)))
        } else if let Some(photo) = self.photo {
            media(Media::PictureSet(photo))
        } else if let Some(sticker) = self.sticker {
            media(Media::File(File::Sticker(sticker)))
        } else if let Some(voice) = self.voice {
            media(Media::File(File::Voice(voice)))
        } else if let Some(contact) = self.contact {
            media(Media::Contact(contact))
        } else if let Some(location) = self.location {
            media(Media::Location(location))
        } else if let Some(user) = self
            .new_chat_participant
            .or_else(|| self.new_chat_members.and_then(|m| m.into_iter().next()))
        {
            MessageKind::UserJoined(user)
        } else if let Some(user) = self.left_chat_participant.or(self.left_chat_member) {
            MessageKind::UserLeft(user)
        } else if let Some(title) = self.new_chat_title {
            MessageKind::ChatTitleChanged { title }
        } else if let Some(pictures) = self.new_chat_photo {
            MessageKind::ChatPictureChanged { pictures }
        } else if self.delete_chat_photo {
            MessageKind::ChatPictureRemoved
        } else if self.group_chat_created || self.supergroup_chat_created || self.channel_chat_created {
            MessageKind::GroupCreated
        } else {
            tracing::trace!(message_id = self.message_id, "Message carries no known marker");
            return None;
        };

        Some(Message {
            message_id: self.message_id,
            sender: self.from,
            timestamp: self.date,
            chat,
            forwarded_from: self.forward_from,
            forwarded_timestamp: self.forward_date.filter(|&date| date != 0),
            reply_to: self.reply_to_message.and_then(|raw| raw.classify()).map(Box::new),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn classify(extra: Value) -> Option<Message> {
        let mut base = json!({
            "message_id": 10,
            "from": {"id": 1, "first_name": "Ann"},
            "date": 1_700_000_000,
            "chat": {"id": -20, "type": "group", "title": "g"},
        });
        if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
            base.extend(extra);
        }
        serde_json::from_value::<RawMessage>(base).unwrap().classify()
    }

    fn photo() -> Value {
        json!([{"file_id": "p", "width": 10, "height": 10}])
    }

    #[test]
    fn test_text_and_command() {
        let text = classify(json!({"text": "hello"})).unwrap();
        assert_eq!(text.kind, MessageKind::Text { text: "hello".into() });

        let cmd = classify(json!({"text": "/echo hi"})).unwrap();
        let cmd = cmd.as_command().unwrap();
        assert_eq!(cmd.name(), "echo");
        assert_eq!(cmd.arguments(), ["hi"]);
    }

    #[test]
    fn test_each_media_marker() {
        let cases = [
            (json!({"audio": {"file_id": "a", "duration": 3}}), "a"),
            (json!({"video": {"file_id": "v", "width": 1, "height": 1, "duration": 2}}), "v"),
            (json!({"document": {"file_id": "d"}}), "d"),
            (json!({"sticker": {"file_id": "s", "width": 1, "height": 1}}), "s"),
            (json!({"voice": {"file_id": "o", "duration": 1}}), "o"),
        ];
        for (payload, id) in cases {
            let msg = classify(payload).unwrap();
            assert_eq!(msg.file().map(File::file_id), Some(id));
        }

        let msg = classify(json!({"photo": photo(), "caption": "look"})).unwrap();
        assert!(matches!(msg.media(), Some(Media::PictureSet(_))));
        assert_eq!(msg.caption(), Some("look"));

        let msg = classify(json!({"contact": {"phone_number": "1", "first_name": "C"}})).unwrap();
        assert!(matches!(msg.media(), Some(Media::Contact(_))));

        let msg = classify(json!({"location": {"longitude": 4.9, "latitude": 52.4}})).unwrap();
        assert!(matches!(msg.media(), Some(Media::Location(_))));
    }

    #[test]
    fn test_each_service_marker() {
        let joined = classify(json!({"new_chat_participant": {"id": 5}})).unwrap();
        assert_eq!(joined.kind, MessageKind::UserJoined(User::new(5)));

        let joined = classify(json!({"new_chat_members": [{"id": 6}, {"id": 7}]})).unwrap();
        assert_eq!(joined.kind, MessageKind::UserJoined(User::new(6)));

        let left = classify(json!({"left_chat_member": {"id": 8}})).unwrap();
        assert_eq!(left.kind, MessageKind::UserLeft(User::new(8)));

        let title = classify(json!({"new_chat_title": "renamed"})).unwrap();
        assert_eq!(title.kind, MessageKind::ChatTitleChanged { title: "renamed".into() });

        let pic = classify(json!({"new_chat_photo": photo()})).unwrap();
        assert!(matches!(pic.kind, MessageKind::ChatPictureChanged { .. }));

        let removed = classify(json!({"delete_chat_photo": true})).unwrap();
        assert_eq!(removed.kind, MessageKind::ChatPictureRemoved);

        for flag in ["group_chat_created", "supergroup_chat_created", "channel_chat_created"] {
            let created = classify(json!({ flag: true })).unwrap();
            assert_eq!(created.kind, MessageKind::GroupCreated);
        }
    }

    #[test]
    fn test_precedence_text_before_media() {
        let msg = classify(json!({"text": "t", "audio": {"file_id": "a", "duration": 1}})).unwrap();
        assert_eq!(msg.text(), Some("t"));

        let msg = classify(json!({
            "document": {"file_id": "d"},
            "photo": photo(),
        }))
        .unwrap();
        assert!(matches!(msg.file(), Some(File::Document(_))));
    }

    #[test]
    fn test_unknown_payload_is_none() {
        assert!(classify(json!({})).is_none());
        assert!(classify(json!({"delete_chat_photo": false, "pinned_message": {}})).is_none());
        assert!(classify(json!({"new_chat_members": []})).is_none());
    }

    #[test]
    fn test_unknown_chat_type_is_none() {
        let msg = classify(json!({
            "text": "hi",
            "chat": {"id": 1, "type": "secret"},
        }));
        assert!(msg.is_none());
    }

    #[test]
    fn test_common_fields() {
        let msg = classify(json!({
            "text": "fwd",
            "forward_from": {"id": 3},
            "forward_date": 1_600_000_000,
            "reply_to_message": {
                "message_id": 9,
                "date": 1,
                "chat": {"id": -20, "type": "group"},
                "text": "original",
            },
        }))
        .unwrap();
        assert_eq!(msg.message_id, 10);
        assert_eq!(msg.sender.as_ref().map(|u| u.id), Some(1));
        assert_eq!(msg.timestamp, 1_700_000_000);
        assert_eq!(msg.forwarded_from, Some(User::new(3)));
        assert_eq!(msg.forwarded_timestamp, Some(1_600_000_000));
        assert_eq!(msg.reply_to.as_ref().and_then(|r| r.text()), Some("original"));
    }

    #[test]
    fn test_unclassifiable_reply_is_dropped() {
        let msg = classify(json!({
            "text": "answer",
            "reply_to_message": {"message_id": 9, "chat": {"id": -20, "type": "group"}},
        }))
        .unwrap();
        assert!(msg.reply_to.is_none());
    }
}
