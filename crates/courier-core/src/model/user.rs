//! Telegram user records.

use serde::{Deserialize, Serialize};

/// A Telegram user or bot.
///
/// Users are immutable values; two users are equal when every field is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier of the user.
    pub id: i64,
    /// First name, if the user set one.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name, if the user set one.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Public username without the leading `@`.
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    /// Creates a user with only an id.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            username: None,
        }
    }

    /// Sets the first name.
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Sets the last name.
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    /// Sets the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Returns a human readable name.
    ///
    /// Prefers "first last", then the first or last name alone, then
    /// `@username`, and finally the numeric id.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => match &self.username {
                Some(username) => format!("@{username}"),
                None => self.id.to_string(),
            },
        }
    }
}
