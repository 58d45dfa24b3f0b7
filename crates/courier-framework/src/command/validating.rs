use std::fmt;

use async_trait::async_trait;
use courier_core::BoxedApi;
use tracing::debug;

use crate::event::MessageEvent;
use crate::handler::MessageHandler;

/// A named positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    name: String,
    required: bool,
}

impl Argument {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Renders as `<name>` when required and `[name]` when optional.
impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required {
            write!(f, "<{}>", self.name)
        } else {
            write!(f, "[{}]", self.name)
        }
    }
}

/// Name, description and arity of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSignature {
    name: String,
    description: String,
    required: Vec<Argument>,
    optional: Vec<Argument>,
}

impl CommandSignature {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: Vec::new(),
            optional: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn required(&self) -> &[Argument] {
        &self.required
    }

    pub fn optional(&self) -> &[Argument] {
        &self.optional
    }

    fn push(&mut self, argument: Argument) {
        if argument.required {
            self.required.push(argument);
        } else {
            self.optional.push(argument);
        }
    }

    /// Whether `count` arguments satisfy the signature.
    pub fn accepts(&self, count: usize) -> bool {
        (self.required.len()..=self.required.len() + self.optional.len()).contains(&count)
    }

    /// Required arguments followed by optional ones, space separated.
    pub fn rendered_arguments(&self) -> String {
        self.required
            .iter()
            .chain(&self.optional)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The reply sent on an arity mismatch, e.g. `Usage: /add <a> <b> [c]`.
    pub fn usage(&self) -> String {
        let arguments = self.rendered_arguments();
        if arguments.is_empty() {
            format!("Usage: /{}", self.name)
        } else {
            format!("Usage: /{} {}", self.name, arguments)
        }
    }

    /// One line of help text, e.g. ` - /add <a> <b> - adds numbers\n`.
    ///
    /// The argument block is always surrounded by spaces, so a command
    /// without arguments renders with a double space.
    pub fn help_line(&self) -> String {
        format!(
            " - /{} {} - {}\n",
            self.name,
            self.rendered_arguments(),
            self.description
        )
    }
}

/// A [`CommandFilter`](super::CommandFilter) that also checks the argument
/// count.
///
/// On a name match the event is always cancelled. With an acceptable
/// argument count the delegate runs; otherwise the usage text is sent back
/// to the chat as a reply to the command.
///
/// ```rust,ignore
/// let add = ValidatingCommandFilter::new("add", "adds numbers", Add)
///     .required("a")
///     .required("b")
///     .optional("c");
/// ```
pub struct ValidatingCommandFilter<H> {
    signature: CommandSignature,
    delegate: H,
}

impl<H: MessageHandler> ValidatingCommandFilter<H> {
    pub fn new(name: impl Into<String>, description: impl Into<String>, delegate: H) -> Self {
        Self {
            signature: CommandSignature::new(name, description),
            delegate,
        }
    }

    /// Appends a required argument.
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.signature.push(Argument::required(name));
        self
    }

    /// Appends an optional argument.
    pub fn optional(mut self, name: impl Into<String>) -> Self {
        self.signature.push(Argument::optional(name));
        self
    }

    /// Appends several arguments, keeping their relative order.
    pub fn arguments(mut self, arguments: impl IntoIterator<Item = Argument>) -> Self {
        for argument in arguments {
            self.signature.push(argument);
        }
        self
    }

    pub fn signature(&self) -> &CommandSignature {
        &self.signature
    }

    pub fn delegate(&self) -> &H {
        &self.delegate
    }
}

#[async_trait]
impl<H: MessageHandler> MessageHandler for ValidatingCommandFilter<H> {
    async fn handle(&self, event: &mut MessageEvent, api: &BoxedApi) -> anyhow::Result<()> {
        let argc = match event.message().as_command() {
            Some(cmd) if cmd.is(&self.signature.name) => cmd.arguments().len(),
            _ => return Ok(()),
        };

        event.cancel();

        if self.signature.accepts(argc) {
            return self.delegate.handle(event, api).await;
        }

        debug!(command = %self.signature.name, argc, "Argument count mismatch");
        let message = event.message();
        api.send_text(
            message.chat_id(),
            &self.signature.usage(),
            Some(message.message_id),
        )
        .await?;
        Ok(())
    }
}
