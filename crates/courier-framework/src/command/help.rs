use std::sync::Arc;

use async_trait::async_trait;
use courier_core::BoxedApi;

use super::validating::{CommandSignature, ValidatingCommandFilter};
use crate::event::MessageEvent;
use crate::handler::MessageHandler;

/// Answers `/help` with a listing of commands.
///
/// The text is rendered once at construction: the prefix on its own line,
/// then one line per listed command in the given order, then the help
/// command itself.
///
/// ```text
/// Commands:
///  - /echo <text> - repeats text
///  - /help  - shows this message
/// ```
pub struct HelpHandler {
    filter: ValidatingCommandFilter<HelpReply>,
}

impl HelpHandler {
    pub fn new<'a>(
        help_description: impl Into<String>,
        prefix: &str,
        commands: impl IntoIterator<Item = &'a CommandSignature>,
    ) -> Self {
        let own = CommandSignature::new("help", help_description);

        let mut text = format!("{prefix}\n");
        for signature in commands {
            text.push_str(&signature.help_line());
        }
        text.push_str(&own.help_line());

        let reply = HelpReply {
            text: Arc::from(text),
        };
        Self {
            filter: ValidatingCommandFilter::new(own.name(), own.description(), reply),
        }
    }

    /// The rendered help text.
    pub fn text(&self) -> &str {
        &self.filter.delegate().text
    }

    pub fn signature(&self) -> &CommandSignature {
        self.filter.signature()
    }
}

#[async_trait]
impl MessageHandler for HelpHandler {
    async fn handle(&self, event: &mut MessageEvent, api: &BoxedApi) -> anyhow::Result<()> {
        self.filter.handle(event, api).await
    }
}

struct HelpReply {
    text: Arc<str>,
}

#[async_trait]
impl MessageHandler for HelpReply {
    async fn handle(&self, event: &mut MessageEvent, api: &BoxedApi) -> anyhow::Result<()> {
        let message = event.message();
        api.send_text(message.chat_id(), &self.text, Some(message.message_id))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingApi, text_message};

    struct Noop;

    #[async_trait]
    impl MessageHandler for Noop {
        async fn handle(&self, _event: &mut MessageEvent, _api: &BoxedApi) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn bare_help() -> HelpHandler {
        let none: [&CommandSignature; 0] = [];
        HelpHandler::new("shows help", "Commands:", none)
    }

    #[test]
    fn test_help_text_format() {
        let echo = ValidatingCommandFilter::new("echo", "repeats text", Noop).required("text");
        let help = HelpHandler::new("shows this message", "My bot", [echo.signature()]);
        assert_eq!(
            help.text(),
            "My bot\n - /echo <text> - repeats text\n - /help  - shows this message\n"
        );
    }

    #[test]
    fn test_help_keeps_listing_order() {
        let a = ValidatingCommandFilter::new("a", "first", Noop).optional("x");
        let b = ValidatingCommandFilter::new("b", "second", Noop);
        let help = HelpHandler::new("help", "", [b.signature(), a.signature()]);
        assert_eq!(
            help.text(),
            "\n - /b  - second\n - /a [x] - first\n - /help  - help\n"
        );
    }

    #[tokio::test]
    async fn test_help_replies_with_text() {
        let help = bare_help();
        let recording = Arc::new(RecordingApi::new());
        let api: BoxedApi = recording.clone();

        let mut event = MessageEvent::new(Arc::new(text_message(7, "/Help")));
        help.handle(&mut event, &api).await.unwrap();

        assert!(event.is_cancelled());
        let sent = recording.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, help.text());
        assert_eq!(sent[0].reply_to_message_id, Some(7));
    }

    #[tokio::test]
    async fn test_help_with_arguments_gets_usage() {
        let help = bare_help();
        let recording = Arc::new(RecordingApi::new());
        let api: BoxedApi = recording.clone();

        let mut event = MessageEvent::new(Arc::new(text_message(8, "/help me")));
        help.handle(&mut event, &api).await.unwrap();

        assert_eq!(recording.sent()[0].text, "Usage: /help");
    }

    #[tokio::test]
    async fn test_help_ignores_other_commands() {
        let help = bare_help();
        let recording = Arc::new(RecordingApi::new());
        let api: BoxedApi = recording.clone();

        let mut event = MessageEvent::new(Arc::new(text_message(9, "/start")));
        help.handle(&mut event, &api).await.unwrap();
        assert!(!event.is_cancelled());
        assert!(recording.sent().is_empty());
    }
}
