//! Inbound data model.
//!
//! Everything here is an immutable value decoded from Bot API JSON.
//! Classification happens once, during decoding, so downstream code only
//! ever sees a [`Message`] with a single [`MessageKind`].

mod chat;
mod command;
mod media;
mod message;
mod raw;
mod update;
mod user;

pub use chat::{Chat, RawChat, UnknownChatType};
pub use command::Command;
pub use media::{
    Audio, Contact, Document, File, Location, Media, Picture, PictureSet, Sticker, Video, Voice,
};
pub use message::{Message, MessageKind};
pub use raw::RawMessage;
pub use update::Update;
pub use user::User;
