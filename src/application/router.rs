//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in `interface/commands`).
//! It parses the command string (e.g., `.diff prod stage`), loads the configuration for
//! this invocation and dispatches it with a fresh `CommandContext`.

use anyhow::Result;
use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::application::context::{Backends, CommandContext};
use crate::domain::traits::{ChatProvider, ConfigProvider};
use crate::interface::commands;
use crate::strings::{logs, messages};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Deployed { env: String },
    Builds { target: String },
    Diff { from: String, to: String },
}

/// What a message asks for. `Reply` carries a usage hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Ignore,
    Reply(&'static str),
    Help,
    Run(Command),
}

fn diff_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\S+)\s+(\S+)$").expect("valid diff regex"))
}

pub fn parse(message: &str) -> Parsed {
    let msg = message.trim();
    if !msg.starts_with('.') {
        return Parsed::Ignore;
    }
    let (cmd, args) = match msg.split_once(char::is_whitespace) {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (msg, ""),
    };

    let tokens: Vec<&str> = args.split_whitespace().collect();

    match cmd {
        ".deployed" => match tokens.as_slice() {
            ["in", env] => Parsed::Run(Command::Deployed { env: env.to_string() }),
            _ => Parsed::Reply(messages::DEPLOYED_USAGE),
        },
        ".builds" => match tokens.as_slice() {
            ["for", target] => Parsed::Run(Command::Builds { target: target.to_string() }),
            _ => Parsed::Reply(messages::BUILDS_USAGE),
        },
        ".diff" => match diff_regex().captures(args) {
            Some(caps) => Parsed::Run(Command::Diff {
                from: caps[1].to_string(),
                to: caps[2].to_string(),
            }),
            None => Parsed::Reply(messages::DIFF_USAGE),
        },
        ".help" => Parsed::Help,
        _ => Parsed::Reply(messages::UNKNOWN_COMMAND),
    }
}

pub struct CommandRouter {
    config: Arc<dyn ConfigProvider>,
    backends: Backends,
}

impl CommandRouter {
    pub fn new(config: Arc<dyn ConfigProvider>, backends: Backends) -> Self {
        Self { config, backends }
    }

    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider,
    {
        let command = match parse(message) {
            Parsed::Ignore => return Ok(()),
            Parsed::Reply(text) => {
                chat.send_message(text).await.map_err(|e| anyhow::anyhow!(e))?;
                return Ok(());
            }
            Parsed::Help => return commands::help::handle_help(chat).await,
            Parsed::Run(command) => command,
        };
        let (cmd, args) = message.trim().split_once(' ').unwrap_or((message.trim(), ""));
        tracing::info!("{}", logs::dispatch(cmd, args.trim(), sender));

        let config = match self.config.load() {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to load configuration: {:#}", e);
                chat.send_message(&messages::config_error(&format!("{e:#}")))
                    .await
                    .map_err(|e| anyhow::anyhow!(e))?;
                return Ok(());
            }
        };
        let ctx = CommandContext::new(config, &self.backends);

        match command {
            Command::Deployed { env } => commands::builds::handle_deployed(&ctx, chat, &env).await,
            Command::Builds { target } => commands::builds::handle_builds(&ctx, chat, &target).await,
            Command::Diff { from, to } => commands::diff::handle_diff(&ctx, chat, &from, &to).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fakes::{
        FakeChat, FakeDocumentStore, FakeFleet, FakeHttp, FakeReleases, StaticConfig, config,
    };
    use crate::domain::types::{Application, EnvironmentDescriptor, Field};

    const API: &str = "https://circleci.com/api/v1/project/PatentNavigation";

    fn apps() -> Vec<Application> {
        vec![
            Application::new("api-gateway-app")
                .with_env("stage", EnvironmentDescriptor::gateway("http://foo.com/my-app/stage")),
            Application::new("bad-app").with_env("stage", EnvironmentDescriptor::default()),
            Application::new("opsworks-app")
                .with_env("stage", EnvironmentDescriptor::fleet_manager("1111")),
        ]
    }

    fn router(http: &Arc<FakeHttp>, fleet: &Arc<FakeFleet>) -> CommandRouter {
        let backends = Backends {
            http: http.clone(),
            document_store: Arc::new(FakeDocumentStore::default()),
            fleet_manager: fleet.clone(),
            release_channel: Arc::new(FakeReleases::returning(&[])),
        };
        CommandRouter::new(Arc::new(StaticConfig(config(apps()))), backends)
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse("hello there"), Parsed::Ignore);
        assert_eq!(
            parse(".deployed in prod"),
            Parsed::Run(Command::Deployed { env: "prod".to_string() })
        );
        assert_eq!(parse(".deployed"), Parsed::Reply(messages::DEPLOYED_USAGE));
        assert_eq!(parse(".deployed in two words"), Parsed::Reply(messages::DEPLOYED_USAGE));
        assert_eq!(
            parse("  .builds for all "),
            Parsed::Run(Command::Builds { target: "all".to_string() })
        );
        assert_eq!(parse(".builds"), Parsed::Reply(messages::BUILDS_USAGE));
        assert_eq!(
            parse(".diff prod   stage"),
            Parsed::Run(Command::Diff { from: "prod".to_string(), to: "stage".to_string() })
        );
        assert_eq!(parse(".diff prod"), Parsed::Reply(messages::DIFF_USAGE));
        assert_eq!(parse(".help"), Parsed::Help);
        assert_eq!(parse(".frobnicate"), Parsed::Reply(messages::UNKNOWN_COMMAND));
    }

    #[tokio::test]
    async fn test_deployed_in_stage() {
        let http = Arc::new(
            FakeHttp::default().with("http://foo.com/my-app/stage/version", "DEV_VERSION"),
        );
        let fleet = Arc::new(FakeFleet::default().with("1111", Some("333")));
        let chat = FakeChat::default();

        router(&http, &fleet)
            .route(&chat, ".deployed in stage", "@alice:example.org")
            .await
            .unwrap();

        let sent = chat.attachments();
        assert_eq!(sent.len(), 1);
        let attachment = &sent[0][0];
        assert_eq!(attachment.pretext.as_deref(), Some("Builds for apps in stage"));
        assert_eq!(attachment.fields[0].value, "api-gateway-app\nbad-app\nopsworks-app");
        assert_eq!(
            attachment.fields[1].value,
            [
                "<https://www.youtube.com/watch?v=ih2xubMaZWI|Circle Build DEV_VERSION>",
                "ERROR",
                "<https://circleci.com/gh/PatentNavigation/opsworks-app/333|Circle Build 333>",
            ]
            .join("\n")
        );
        assert_eq!(
            attachment.fields[2],
            Field {
                title: "bad-app error".to_string(),
                value: "Unable to determine app method".to_string(),
                short: false
            }
        );
    }

    #[tokio::test]
    async fn test_builds_for_one_app() {
        let url = format!("{API}/api-gateway-app/tree/main?circle-token=testtoken&limit=1&filter=successful");
        let body = r#"[{"build_num": 222, "vcs_revision": "abc", "vcs_url": "https://github.com/PatentNavigation/api-gateway-app"}]"#;
        let http = Arc::new(FakeHttp::default().with(&url, body));
        let chat = FakeChat::default();

        router(&http, &Arc::new(FakeFleet::default()))
            .route(&chat, ".builds for api-gateway-app", "@alice:example.org")
            .await
            .unwrap();

        let attachment = &chat.attachments()[0][0];
        assert_eq!(attachment.pretext.as_deref(), Some(messages::LATEST_BUILDS_PRETEXT));
        assert_eq!(
            attachment.fields[1].value,
            "<https://circleci.com/gh/PatentNavigation/api-gateway-app/222|Circle Build 222>"
        );
        assert_eq!(attachment.fields.len(), 2);
    }

    #[tokio::test]
    async fn test_builds_for_unknown_app() {
        let http = Arc::new(FakeHttp::default());
        let fleet = Arc::new(FakeFleet::default());
        let chat = FakeChat::default();

        router(&http, &fleet)
            .route(&chat, ".builds for fooblyfoo", "@alice:example.org")
            .await
            .unwrap();

        assert_eq!(chat.messages(), vec!["I don't know about an app named fooblyfoo".to_string()]);
        assert!(chat.attachments().is_empty());
        assert!(http.requests().is_empty());
        assert!(fleet.requests().is_empty());
    }

    #[tokio::test]
    async fn test_usage_and_ignored_messages() {
        let http = Arc::new(FakeHttp::default());
        let chat = FakeChat::default();
        let router = router(&http, &Arc::new(FakeFleet::default()));

        router.route(&chat, "just chatting", "@alice:example.org").await.unwrap();
        router.route(&chat, ".diff prod", "@alice:example.org").await.unwrap();
        router.route(&chat, ".help", "@alice:example.org").await.unwrap();

        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], messages::DIFF_USAGE);
        assert_eq!(messages[1], crate::strings::help::MAIN);
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_no_apps_configured() {
        let backends = Backends {
            http: Arc::new(FakeHttp::default()),
            document_store: Arc::new(FakeDocumentStore::default()),
            fleet_manager: Arc::new(FakeFleet::default()),
            release_channel: Arc::new(FakeReleases::returning(&[])),
        };
        let router = CommandRouter::new(Arc::new(StaticConfig(config(Vec::new()))), backends);
        let chat = FakeChat::default();

        router.route(&chat, ".diff prod stage", "@alice:example.org").await.unwrap();
        assert_eq!(chat.messages(), vec![messages::NO_APPS.to_string()]);
    }
}
