#![recursion_limit = "256"]
//! # Main Entry Point
//!
//! Initializes the bot:
//! - Domain: Configuration and Types
//! - Infrastructure: Matrix, HTTP, console
//! - Application: Router, version sources, CI, diff
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::SyncRoomMessageEvent,
    },
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::context::Backends;
use crate::application::router::CommandRouter;
use crate::domain::config::AppConfig;
use crate::infrastructure::config::FileConfig;
use crate::infrastructure::console::ConsoleChat;
use crate::infrastructure::http::ReqwestTransport;
use crate::infrastructure::matrix::MatrixService;
use crate::infrastructure::unavailable::UnconfiguredBackend;
use crate::strings::logs;

#[derive(Parser)]
#[command(name = "deploybot", about = "Chat bot reporting deployed builds and diffs")]
struct Cli {
    /// Path to the YAML configuration
    #[arg(long, env = "DEPLOYBOT_CONFIG", default_value = "data/config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Connect to Matrix and answer commands (default)
    Serve,
    /// Run a single command and print the reply, e.g. `ask .diff prod stage`
    Ask {
        /// Print attachments as JSON instead of markdown
        #[arg(long)]
        json: bool,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration (validated once at startup, re-read per command)
    let config = AppConfig::load(&cli.config)?;

    // 2. Logging Setup
    let log_dir = cli
        .config
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    if !log_dir.exists() {
        fs::create_dir_all(&log_dir).context("Failed to create log directory")?;
    }
    let log_path = log_dir.join("session.log");
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(&log_dir, "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn,reqwest=warn")
    });

    // Layer for file (Always active)
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    // Console logs would interleave with `ask` output, so they go to stderr there.
    let serving = !matches!(cli.mode, Some(Mode::Ask { .. }));
    let stdout_layer = serving.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stdout));
    let stderr_layer = (!serving).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
    });

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .with(stderr_layer)
        .init();

    tracing::info!("{}", logs::STARTING);

    // 3. Initialize Infrastructure
    let unconfigured = Arc::new(UnconfiguredBackend);
    let backends = Backends {
        http: Arc::new(ReqwestTransport),
        document_store: unconfigured.clone(),
        fleet_manager: unconfigured.clone(),
        release_channel: unconfigured,
    };
    let router = Arc::new(CommandRouter::new(
        Arc::new(FileConfig::new(cli.config.clone())),
        backends,
    ));

    match cli.mode {
        Some(Mode::Ask { json, command }) => {
            let chat = ConsoleChat::json(json);
            router.route(&chat, &command.join(" "), "console").await
        }
        Some(Mode::Serve) | None => serve(config, router).await,
    }
}

async fn serve(config: AppConfig, router: Arc<CommandRouter>) -> Result<()> {
    // 4. Matrix Setup
    let client = Client::builder()
        .homeserver_url(&config.services.matrix.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(
            &config.services.matrix.username,
            &config.services.matrix.password,
        )
        .send()
        .await?;

    tracing::info!("{}", logs::logged_in(&config.services.matrix.username));

    // 5. Event Loop
    let start_time = std::time::SystemTime::now();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = router.clone();

        async move {
            if let Some(original_msg) = ev.as_original() {
                // Ignore events older than start_time
                let ts = ev.origin_server_ts();
                let event_time =
                    std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
                if event_time < start_time {
                    return;
                }

                if let matrix_sdk::ruma::events::room::message::MessageType::Text(text_content) =
                    &original_msg.content.msgtype
                {
                    if original_msg.sender == room.own_user_id() {
                        return;
                    }
                    let body = &text_content.body;
                    tracing::debug!("Received message from {}: {}", original_msg.sender, body);

                    let chat = MatrixService::new(room);
                    if let Err(e) = router
                        .route(&chat, body, original_msg.sender.as_str())
                        .await
                    {
                        tracing::error!("Failed to route message: {}", e);
                    }
                }
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            if let Err(e) = room.join().await {
                tracing::warn!("Failed to join {}: {}", room.room_id(), e);
            }
        }
    });

    // 6. Sync
    tracing::info!("{}", logs::SYNC_LOOP_START);
    if let Err(e) = client.sync(SyncSettings::default()).await {
        tracing::error!("{}", logs::sync_loop_fail(&e.to_string()));
        return Err(e.into());
    }
    Ok(())
}
