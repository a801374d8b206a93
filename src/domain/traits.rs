//! # Domain Traits
//!
//! Abstract interfaces for the bot's collaborators (chat, configuration, HTTP and the
//! SDK-backed stores). Implementations live in the Infrastructure layer; tests swap in fakes.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::config::AppConfig;
use crate::domain::error::ResolveError;
use crate::domain::types::{Application, Attachment, BuildId, BuildInfo, Revision};

/// Abstract interface for a Chat Provider (e.g., Matrix, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a plain message to the room
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Send a batch of attachments as one reply
    async fn send_attachments(&self, attachments: &[Attachment]) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// Source of the configuration, read once per command.
pub trait ConfigProvider: Send + Sync {
    fn load(&self) -> Result<AppConfig>;
}

/// One way of finding out which build an app runs in an environment.
#[async_trait]
pub trait VersionSource: Send + Sync {
    async fn fetch_build_version(&self, app: &Application, env: &str)
    -> Result<BuildId, ResolveError>;
}

/// CI provider: latest builds, build revisions and build links.
#[async_trait]
pub trait BuildProvider: Send + Sync {
    /// Web link to a build; the dev sentinel gets a fixed placeholder.
    fn build_url(&self, app: &Application, build: &BuildId) -> String;

    async fn last_build(&self, app: &Application) -> Result<BuildInfo, ResolveError>;

    async fn revision_for_build(
        &self,
        app: &Application,
        build: &BuildId,
    ) -> Result<Revision, ResolveError>;
}

/// Plain GET transport used by the gateway source and the CI client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `url` and return the response body. Non-2xx statuses are errors.
    async fn get(&self, url: &str, accept: Option<&str>) -> Result<String>;
}

/// Key-value document store holding rendered HTML per deployment key.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_html(&self, table: &str, key: &str) -> Result<String>;
}

/// Fleet-management service describing deployed apps.
#[async_trait]
pub trait FleetManager: Send + Sync {
    async fn describe_apps(&self, app_ids: &[String]) -> Result<Vec<FleetApp>>;
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FleetApp {
    #[serde(default)]
    pub attributes: FleetAppAttributes,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FleetAppAttributes {
    #[serde(default)]
    pub document_root: Option<String>,
}

/// Release-channel record store.
#[async_trait]
pub trait ReleaseChannelStore: Send + Sync {
    /// Records matching the query, ordered as requested.
    async fn query(&self, query: &ReleaseQuery) -> Result<Vec<ReleaseRecord>>;
}

/// Boolean attribute a release-channel query filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseFlag {
    Release,
    Dev,
}

impl ReleaseFlag {
    pub fn for_env(env: &str) -> Option<Self> {
        match env {
            "prod" => Some(Self::Release),
            "stage" => Some(Self::Dev),
            _ => None,
        }
    }

    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Dev => "dev",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseQuery {
    pub table: String,
    pub name: String,
    pub flag: Option<ReleaseFlag>,
    pub newest_first: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReleaseRecord {
    pub version: String,
}
