//! Media payloads attached to messages.
//!
//! ```text
//! Media
//! ├── Contact
//! ├── Location
//! ├── PictureSet
//! └── File
//!     ├── Audio
//!     ├── Document
//!     ├── Picture
//!     ├── Sticker
//!     ├── Video
//!     └── Voice
//! ```

use serde::{Deserialize, Serialize};

/// A single sized picture (a Bot API `PhotoSize`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub file_id: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    pub width: u32,
    pub height: u32,
}

/// The same picture in several sizes, smallest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PictureSet {
    pub pictures: Vec<Picture>,
}

impl PictureSet {
    /// Returns the picture with the most pixels.
    pub fn largest(&self) -> Option<&Picture> {
        self.pictures
            .iter()
            .max_by_key(|p| u64::from(p.width) * u64::from(p.height))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audio {
    pub file_id: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    pub duration: u32,
    #[serde(default)]
    pub performer: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub file_id: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default, rename = "thumb", alias = "thumbnail")]
    pub thumbnail: Option<Picture>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sticker {
    pub file_id: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    pub width: u32,
    pub height: u32,
    #[serde(default, rename = "thumb", alias = "thumbnail")]
    pub thumbnail: Option<Picture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub file_id: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    pub width: u32,
    pub height: u32,
    pub duration: u32,
    #[serde(default, rename = "thumb", alias = "thumbnail")]
    pub thumbnail: Option<Picture>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub file_id: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    pub duration: u32,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// A shared phone contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub phone_number: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// A point on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
}

/// A downloadable file.
#[derive(Debug, Clone, PartialEq)]
pub enum File {
    Audio(Audio),
    Document(Document),
    Picture(Picture),
    Sticker(Sticker),
    Video(Video),
    Voice(Voice),
}

impl File {
    /// Returns the Bot API file id used to download or resend the file.
    pub fn file_id(&self) -> &str {
        match self {
            File::Audio(f) => &f.file_id,
            File::Document(f) => &f.file_id,
            File::Picture(f) => &f.file_id,
            File::Sticker(f) => &f.file_id,
            File::Video(f) => &f.file_id,
            File::Voice(f) => &f.file_id,
        }
    }

    /// Returns the file size in bytes when the server reported it.
    pub fn file_size(&self) -> Option<u64> {
        match self {
            File::Audio(f) => f.file_size,
            File::Document(f) => f.file_size,
            File::Picture(f) => f.file_size,
            File::Sticker(f) => f.file_size,
            File::Video(f) => f.file_size,
            File::Voice(f) => f.file_size,
        }
    }
}

/// Media attached to a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Media {
    Contact(Contact),
    Location(Location),
    PictureSet(PictureSet),
    File(File),
}

impl Media {
    /// Returns the nested file, if this media is one.
    pub fn as_file(&self) -> Option<&File> {
        match self {
            Media::File(file) => Some(file),
            _ => None,
        }
    }
}
