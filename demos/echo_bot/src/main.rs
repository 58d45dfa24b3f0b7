//! Echo Bot
//!
//! Demonstrates ordered dispatch with type matchers, command filters and
//! event cancellation.
//!
//! Handlers run in registration order:
//!
//! ```text
//! ANY      logging          never cancels
//! COMMAND  /help            cancels
//! COMMAND  /echo            cancels
//! COMMAND  /repeat <n> <w>  cancels, replies with usage on bad arity
//! COMMAND  fallback         only reached by unknown commands
//! FILE_ANY file info        replies with the file id
//! ```
//!
//! # Usage
//!
//! ```bash
//! COURIER_BOT__TOKEN=123:abc cargo run --package echo-bot
//! cargo run --package echo-bot -- --config deploy/courier.toml
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use courier::prelude::*;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "echo-bot", about = "A simple echo bot built on Courier")]
struct Args {
    /// Configuration file. Searched in the usual locations when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile, e.g. `production`.
    #[arg(short, long)]
    profile: Option<String>,

    /// Bot token. Files and COURIER_BOT__TOKEN take precedence.
    #[arg(long)]
    token: Option<String>,
}

/// Longest reply `/repeat` will produce.
const MAX_REPEAT: usize = 20;

fn dispatcher() -> Dispatcher {
    let logging = handler_fn(|event, _api| {
        Box::pin(async move {
            let message = event.message();
            let from = message
                .sender
                .as_ref()
                .map(User::display_name)
                .unwrap_or_default();
            info!(
                chat_id = message.chat_id(),
                category = ?Category::of(message),
                from = %from,
                text = message.text().unwrap_or_default(),
                "Message received"
            );
            Ok(())
        })
    });

    let echo = CommandFilter::new(
        "echo",
        handler_fn(|event, api| {
            Box::pin(async move {
                let message = event.message();
                let text = message
                    .as_command()
                    .map(|command| command.arguments().join(" "))
                    .unwrap_or_default();
                if !text.is_empty() {
                    api.send_text(message.chat_id(), &text, Some(message.message_id))
                        .await?;
                }
                Ok(())
            })
        }),
    );
    let echo_signature = CommandSignature::new("echo", "repeats your text");

    let repeat = ValidatingCommandFilter::new(
        "repeat",
        "repeats a word up to 20 times",
        handler_fn(|event, api| {
            Box::pin(async move {
                let message = event.message();
                let Some(command) = message.as_command() else {
                    return Ok(());
                };
                let [count, word] = command.arguments() else {
                    return Ok(());
                };
                let reply = match count.parse::<usize>() {
                    Ok(n) if (1..=MAX_REPEAT).contains(&n) => vec![word.as_str(); n].join(" "),
                    _ => format!("<count> must be a number from 1 to {MAX_REPEAT}"),
                };
                api.send_text(message.chat_id(), &reply, Some(message.message_id))
                    .await?;
                Ok(())
            })
        }),
    )
    .required("count")
    .required("word");

    let help = HelpHandler::new(
        "shows this message",
        "Echo Bot commands:",
        [&echo_signature, repeat.signature()],
    );

    let unknown = handler_fn(|event, api| {
        Box::pin(async move {
            let message = event.message();
            if let Some(command) = message.as_command() {
                let reply = format!("Unknown command /{}, try /help", command.name());
                api.send_text(message.chat_id(), &reply, None).await?;
            }
            Ok(())
        })
    });

    let file_info = handler_fn(|event, api| {
        Box::pin(async move {
            let message = event.message();
            if let Some(file) = message.file() {
                let size = file
                    .file_size()
                    .map(|bytes| format!("{bytes} bytes"))
                    .unwrap_or_else(|| "unknown size".into());
                let reply = format!("file_id: {}\nsize: {size}", file.file_id());
                api.send_text(message.chat_id(), &reply, Some(message.message_id))
                    .await?;
            }
            Ok(())
        })
    });

    DispatcherBuilder::new()
        .register(MessageType::ANY, logging)
        .register(MessageType::COMMAND, help)
        .register(MessageType::COMMAND, echo)
        .register(MessageType::COMMAND, repeat)
        .register(MessageType::COMMAND, unknown)
        .register(MessageType::FILE_ANY, file_info)
        .build()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = CourierRuntime::builder();
    if let Some(path) = &args.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = &args.profile {
        builder = builder.profile(profile);
    }
    if let Some(token) = args.token {
        let mut base = CourierConfig::default();
        base.bot.token = token;
        builder = builder.merge(base);
    }

    let runtime = builder.build()?;
    runtime.run(dispatcher()).await?;

    Ok(())
}
