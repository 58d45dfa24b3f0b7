//! Structural type matching for messages.
//!
//! A [`TypeMatcher`] is a predicate over [`Message`] with an optional parent.
//! A matcher accepts a message only when every ancestor accepts it too, so
//! `FILE_AUDIO` implies `FILE_ANY` implies `MEDIA_ANY` implies `ANY`.
//!
//! ```text
//! ANY
//! ├── TEXT
//! ├── COMMAND
//! ├── CHAT_TITLE_CHANGED / CHAT_PICTURE_CHANGED / CHAT_PICTURE_REMOVED
//! ├── USER_JOINED / USER_LEFT / GROUP_CREATED
//! └── MEDIA_ANY
//!     ├── MEDIA_CONTACT / MEDIA_LOCATION / MEDIA_PICTURE_SET
//!     └── FILE_ANY
//!         └── FILE_AUDIO / FILE_DOCUMENT / FILE_PICTURE
//!             FILE_STICKER / FILE_VIDEO / FILE_VOICE
//! ```
//!
//! Applications can add their own refinements:
//!
//! ```rust,ignore
//! static FORWARDED_TEXT: TypeMatcher =
//!     TypeMatcher::refine(MessageType::TEXT, |m| m.is_forwarded());
//! ```

use std::fmt;

use courier_core::{File, Media, Message, MessageKind};

/// The built-in message categories, one per catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Any,
    Text,
    Command,
    ChatTitleChanged,
    ChatPictureChanged,
    ChatPictureRemoved,
    UserJoined,
    UserLeft,
    GroupCreated,
    MediaAny,
    MediaContact,
    MediaLocation,
    MediaPictureSet,
    FileAny,
    FileAudio,
    FileDocument,
    FilePicture,
    FileSticker,
    FileVideo,
    FileVoice,
}

impl Category {
    /// Returns the most specific category of a message.
    pub fn of(message: &Message) -> Self {
        match &message.kind {
            MessageKind::Text { .. } => Category::Text,
            MessageKind::Command(_) => Category::Command,
            MessageKind::ChatTitleChanged { .. } => Category::ChatTitleChanged,
            MessageKind::ChatPictureChanged { .. } => Category::ChatPictureChanged,
            MessageKind::ChatPictureRemoved => Category::ChatPictureRemoved,
            MessageKind::UserJoined(_) => Category::UserJoined,
            MessageKind::UserLeft(_) => Category::UserLeft,
            MessageKind::GroupCreated => Category::GroupCreated,
            MessageKind::Media { media, .. } => match media {
                Media::Contact(_) => Category::MediaContact,
                Media::Location(_) => Category::MediaLocation,
                Media::PictureSet(_) => Category::MediaPictureSet,
                Media::File(file) => match file {
                    File::Audio(_) => Category::FileAudio,
                    File::Document(_) => Category::FileDocument,
                    File::Picture(_) => Category::FilePicture,
                    File::Sticker(_) => Category::FileSticker,
                    File::Video(_) => Category::FileVideo,
                    File::Voice(_) => Category::FileVoice,
                },
            },
        }
    }
}

/// A composable message predicate.
#[derive(Clone, Copy)]
pub struct TypeMatcher {
    category: Category,
    parent: Option<&'static TypeMatcher>,
    check: fn(&Message) -> bool,
}

impl TypeMatcher {
    const fn new(category: Category, parent: &'static TypeMatcher, check: fn(&Message) -> bool) -> Self {
        Self {
            category,
            parent: Some(parent),
            check,
        }
    }

    /// Narrows `parent` with an extra check. The result keeps the parent's
    /// category.
    pub const fn refine(parent: &'static TypeMatcher, check: fn(&Message) -> bool) -> Self {
        Self::new(parent.category, parent, check)
    }

    /// Returns the catalog matcher for a category.
    pub fn of(category: Category) -> &'static TypeMatcher {
        match category {
            Category::Any => MessageType::ANY,
            Category::Text => MessageType::TEXT,
            Category::Command => MessageType::COMMAND,
            Category::ChatTitleChanged => MessageType::CHAT_TITLE_CHANGED,
            Category::ChatPictureChanged => MessageType::CHAT_PICTURE_CHANGED,
            Category::ChatPictureRemoved => MessageType::CHAT_PICTURE_REMOVED,
            Category::UserJoined => MessageType::USER_JOINED,
            Category::UserLeft => MessageType::USER_LEFT,
            Category::GroupCreated => MessageType::GROUP_CREATED,
            Category::MediaAny => MessageType::MEDIA_ANY,
            Category::MediaContact => MessageType::MEDIA_CONTACT,
            Category::MediaLocation => MessageType::MEDIA_LOCATION,
            Category::MediaPictureSet => MessageType::MEDIA_PICTURE_SET,
            Category::FileAny => MessageType::FILE_ANY,
            Category::FileAudio => MessageType::FILE_AUDIO,
            Category::FileDocument => MessageType::FILE_DOCUMENT,
            Category::FilePicture => MessageType::FILE_PICTURE,
            Category::FileSticker => MessageType::FILE_STICKER,
            Category::FileVideo => MessageType::FILE_VIDEO,
            Category::FileVoice => MessageType::FILE_VOICE,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn parent(&self) -> Option<&'static TypeMatcher> {
        self.parent
    }

    /// Evaluates the ancestor chain root first, then this matcher's check.
    pub fn matches(&self, message: &Message) -> bool {
        self.parent.is_none_or(|parent| parent.matches(message)) && (self.check)(message)
    }
}

impl fmt::Debug for TypeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMatcher")
            .field("category", &self.category)
            .field("refined", &self.parent.is_some_and(|p| p.category == self.category))
            .finish()
    }
}

/// The built-in matcher catalog.
pub struct MessageType;

impl MessageType {
    pub const ANY: &'static TypeMatcher = &TypeMatcher {
        category: Category::Any,
        parent: None,
        check: any,
    };

    pub const TEXT: &'static TypeMatcher = &TypeMatcher::new(Category::Text, Self::ANY, is_text);
    pub const COMMAND: &'static TypeMatcher =
        &TypeMatcher::new(Category::Command, Self::ANY, is_command);
    pub const CHAT_TITLE_CHANGED: &'static TypeMatcher =
        &TypeMatcher::new(Category::ChatTitleChanged, Self::ANY, is_title_changed);
    pub const CHAT_PICTURE_CHANGED: &'static TypeMatcher =
        &TypeMatcher::new(Category::ChatPictureChanged, Self::ANY, is_picture_changed);
    pub const CHAT_PICTURE_REMOVED: &'static TypeMatcher =
        &TypeMatcher::new(Category::ChatPictureRemoved, Self::ANY, is_picture_removed);
    pub const USER_JOINED: &'static TypeMatcher =
        &TypeMatcher::new(Category::UserJoined, Self::ANY, is_user_joined);
    pub const USER_LEFT: &'static TypeMatcher =
        &TypeMatcher::new(Category::UserLeft, Self::ANY, is_user_left);
    pub const GROUP_CREATED: &'static TypeMatcher =
        &TypeMatcher::new(Category::GroupCreated, Self::ANY, is_group_created);

    pub const MEDIA_ANY: &'static TypeMatcher =
        &TypeMatcher::new(Category::MediaAny, Self::ANY, is_media);
    pub const MEDIA_CONTACT: &'static TypeMatcher =
        &TypeMatcher::new(Category::MediaContact, Self::MEDIA_ANY, is_contact);
    pub const MEDIA_LOCATION: &'static TypeMatcher =
        &TypeMatcher::new(Category::MediaLocation, Self::MEDIA_ANY, is_location);
    pub const MEDIA_PICTURE_SET: &'static TypeMatcher =
        &TypeMatcher::new(Category::MediaPictureSet, Self::MEDIA_ANY, is_picture_set);

    pub const FILE_ANY: &'static TypeMatcher =
        &TypeMatcher::new(Category::FileAny, Self::MEDIA_ANY, is_file);
    pub const FILE_AUDIO: &'static TypeMatcher =
        &TypeMatcher::new(Category::FileAudio, Self::FILE_ANY, is_audio);
    pub const FILE_DOCUMENT: &'static TypeMatcher =
        &TypeMatcher::new(Category::FileDocument, Self::FILE_ANY, is_document);
    pub const FILE_PICTURE: &'static TypeMatcher =
        &TypeMatcher::new(Category::FilePicture, Self::FILE_ANY, is_picture);
    pub const FILE_STICKER: &'static TypeMatcher =
        &TypeMatcher::new(Category::FileSticker, Self::FILE_ANY, is_sticker);
    pub const FILE_VIDEO: &'static TypeMatcher =
        &TypeMatcher::new(Category::FileVideo, Self::FILE_ANY, is_video);
    pub const FILE_VOICE: &'static TypeMatcher =
        &TypeMatcher::new(Category::FileVoice, Self::FILE_ANY, is_voice);
}

// Checks only look at their own level; ancestors are enforced by `matches`.

fn any(_: &Message) -> bool {
    true
}

fn is_text(m: &Message) -> bool {
    matches!(m.kind, MessageKind::Text { .. })
}

fn is_command(m: &Message) -> bool {
    matches!(m.kind, MessageKind::Command(_))
}

fn is_title_changed(m: &Message) -> bool {
    matches!(m.kind, MessageKind::ChatTitleChanged { .. })
}

fn is_picture_changed(m: &Message) -> bool {
    matches!(m.kind, MessageKind::ChatPictureChanged { .. })
}

fn is_picture_removed(m: &Message) -> bool {
    matches!(m.kind, MessageKind::ChatPictureRemoved)
}

fn is_user_joined(m: &Message) -> bool {
    matches!(m.kind, MessageKind::UserJoined(_))
}

fn is_user_left(m: &Message) -> bool {
    matches!(m.kind, MessageKind::UserLeft(_))
}

fn is_group_created(m: &Message) -> bool {
    matches!(m.kind, MessageKind::GroupCreated)
}

fn is_media(m: &Message) -> bool {
    m.media().is_some()
}

fn is_contact(m: &Message) -> bool {
    matches!(m.media(), Some(Media::Contact(_)))
}

fn is_location(m: &Message) -> bool {
    matches!(m.media(), Some(Media::Location(_)))
}

fn is_picture_set(m: &Message) -> bool {
    matches!(m.media(), Some(Media::PictureSet(_)))
}

fn is_file(m: &Message) -> bool {
    m.file().is_some()
}

fn is_audio(m: &Message) -> bool {
    matches!(m.file(), Some(File::Audio(_)))
}

fn is_document(m: &Message) -> bool {
    matches!(m.file(), Some(File::Document(_)))
}

fn is_picture(m: &Message) -> bool {
    matches!(m.file(), Some(File::Picture(_)))
}

fn is_sticker(m: &Message) -> bool {
    matches!(m.file(), Some(File::Sticker(_)))
}

fn is_video(m: &Message) -> bool {
    matches!(m.file(), Some(File::Video(_)))
}

fn is_voice(m: &Message) -> bool {
    matches!(m.file(), Some(File::Voice(_)))
}
