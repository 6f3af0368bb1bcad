//! Jiraa CLI
//!
//! Invokes `/jiraa` against a running daemon and manages its settings.

use anyhow::Result;
use clap::{Parser, Subcommand};
use jiraa_client::{JiraaClient, ROOM_MESSAGE_METHOD};
use jiraa_core::models::{Delivery, RoomMessage};

#[derive(Parser, Debug)]
#[command(name = "jiraa")]
#[command(about = "Jiraa - look up tracker issues from chat", long_about = None)]
struct Args {
    /// Daemon socket path
    #[arg(short, long, default_value = "/tmp/jiraa.sock")]
    socket: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run `/jiraa [ARGS]...` as a chat user
    Run {
        /// Command arguments, e.g. an issue key or `help`
        args: Vec<String>,

        #[arg(long, default_value = "GENERAL")]
        room: String,

        #[arg(long, default_value = "jiraa")]
        user: String,
    },

    /// Print room messages posted by any invocation
    Watch,

    /// Show or change the daemon settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Current values (token masked)
    Show,
    /// Set a setting by id, e.g. `jiraalt_url`
    Set { id: String, value: String },
    /// Clear every setting
    Reset,
    /// List known settings
    Definitions,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let client = JiraaClient::new(args.socket);

    match args.command {
        Command::Run { args, room, user } => {
            let result = client.command_execute(&user, &room, &args).await?;
            let delivery: Delivery = serde_json::from_value(result["delivery"].clone())?;
            println!("{}", render_delivery(&delivery));
        }
        Command::Watch => {
            let mut rx = client.subscribe_notifications().await?;
            eprintln!("Watching room messages, Ctrl-C to stop");
            while let Some(notification) = rx.recv().await {
                if notification.method != ROOM_MESSAGE_METHOD {
                    tracing::debug!("ignoring {}", notification.method);
                    continue;
                }
                let message: RoomMessage =
                    serde_json::from_value(notification.params["message"].clone())?;
                println!("[{}]", message.room_id);
                println!("{}", render_room_message(&message));
            }
        }
        Command::Settings { action } => {
            let result = match action {
                SettingsAction::Show => client.settings_get().await?,
                SettingsAction::Set { id, value } => client.settings_set(&id, &value).await?,
                SettingsAction::Reset => client.settings_reset().await?,
                SettingsAction::Definitions => client.settings_definitions().await?,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn render_delivery(delivery: &Delivery) -> String {
    match delivery {
        Delivery::RoomMessage(message) => render_room_message(message),
        Delivery::Notification(notification) => format!("(only you) {}", notification.text()),
    }
}

fn render_room_message(message: &RoomMessage) -> String {
    let mut out = Vec::new();
    if let Some(text) = &message.text {
        out.push(text.clone());
    }
    for attachment in &message.attachments {
        out.push(format!("{} <{}>", attachment.author.name, attachment.author.link));
        for field in &attachment.fields {
            out.push(format!("  {}: {}", field.title, field.value));
        }
        out.push(format!("  {}", attachment.text));
    }
    out.join("\n")
}
