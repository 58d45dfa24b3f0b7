//! Bot command parsing.
//!
//! Grammar: `/<name>[@<target>][ <arg0>[ <arg1> ...]]`.
//!
//! Arguments are split on every single space. Consecutive spaces therefore
//! produce empty arguments; they are kept so that parsing is lossless.

use std::fmt;

/// A parsed bot command such as `/echo@my_bot hello world`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    raw: String,
    name: String,
    target: Option<String>,
    arguments: Vec<String>,
}

impl Command {
    /// Parses a raw message body.
    ///
    /// Returns `None` when the body does not start with `/`.
    pub fn parse(raw: &str) -> Option<Self> {
        let body = raw.strip_prefix('/')?;

        let (head, rest) = match body.split_once(' ') {
            Some((head, rest)) => (head, Some(rest)),
            None => (body, None),
        };

        let (name, target) = match head.split_once('@') {
            Some((name, target)) => (name, Some(target.to_string())),
            None => (head, None),
        };

        let arguments = rest
            .map(|rest| rest.split(' ').map(str::to_string).collect())
            .unwrap_or_default();

        Some(Self {
            raw: raw.to_string(),
            name: name.to_string(),
            target,
            arguments,
        })
    }

    /// The full message body, including the leading `/`.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The command name without `/` or `@target`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bot username the command was addressed to, if any.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// The space-separated arguments following the command token.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Returns `true` if the name equals `name`, ignoring ASCII case.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Rebuilds the command text from its parsed parts.
    pub fn to_text(&self) -> String {
        let mut text = format!("/{}", self.name);
        if let Some(target) = &self.target {
            text.push('@');
            text.push_str(target);
        }
        if !self.arguments.is_empty() {
            text.push(' ');
            text.push_str(&self.arguments.join(" "));
        }
        text
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
