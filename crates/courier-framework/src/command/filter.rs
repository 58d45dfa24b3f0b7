use async_trait::async_trait;
use courier_core::BoxedApi;
use tracing::trace;

use crate::event::MessageEvent;
use crate::handler::MessageHandler;

/// Routes one command name to a delegate.
///
/// On a match the event is cancelled *before* the delegate runs, so the
/// delegate may clear the flag to let later handlers see the command too.
/// Names compare case-insensitively. Non-command messages pass through
/// untouched.
pub struct CommandFilter<H> {
    name: String,
    delegate: H,
}

impl<H: MessageHandler> CommandFilter<H> {
    pub fn new(name: impl Into<String>, delegate: H) -> Self {
        Self {
            name: name.into(),
            delegate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<H: MessageHandler> MessageHandler for CommandFilter<H> {
    async fn handle(&self, event: &mut MessageEvent, api: &BoxedApi) -> anyhow::Result<()> {
        let matched = event
            .message()
            .as_command()
            .is_some_and(|cmd| cmd.is(&self.name));
        if !matched {
            return Ok(());
        }

        trace!(command = %self.name, "Command matched");
        event.cancel();
        self.delegate.handle(event, api).await
    }
}
