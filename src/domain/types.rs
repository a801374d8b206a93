//! # Domain Types
//!
//! Common data structures used across the resolution engine: the app catalogue,
//! build and revision identifiers, per-app outcomes and chat attachments.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::error::ResolveError;

/// Build number reported for unreleased/development deployments.
pub const DEV_VERSION: &str = "DEV_VERSION";

/// Environment name that stands for "the latest successful CI build".
pub const LATEST: &str = "latest";

/// An application from the catalogue.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Application {
    pub id: String,
    /// CircleCI project path override (e.g. `PatentNavigation/custom-app`).
    #[serde(default)]
    pub circle_url: Option<String>,
    /// Default branch override.
    #[serde(default)]
    pub branch: Option<String>,
    /// Name used for release-channel record lookups.
    #[serde(default)]
    pub app_name: Option<String>,
    /// Meta tag name override for document-store lookups.
    #[serde(default)]
    pub meta_name: Option<String>,
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentDescriptor>,
}

/// Builders for catalogues assembled in code.
#[cfg(test)]
impl Application {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            circle_url: None,
            branch: None,
            app_name: None,
            meta_name: None,
            environments: BTreeMap::new(),
        }
    }

    pub fn with_env(mut self, env: &str, descriptor: EnvironmentDescriptor) -> Self {
        self.environments.insert(env.to_string(), descriptor);
        self
    }
}

impl Application {
    /// The descriptor for `env`, or `MissingEnvironment`.
    pub fn environment(&self, env: &str) -> Result<&EnvironmentDescriptor, ResolveError> {
        self.environments
            .get(env)
            .ok_or_else(|| ResolveError::MissingEnvironment {
                app: self.id.clone(),
                env: env.to_string(),
            })
    }

    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or("main")
    }

    pub fn meta_name(&self) -> String {
        self.meta_name
            .clone()
            .unwrap_or_else(|| format!("{}/config/environment", self.id))
    }
}

/// Capability keys of one environment of an app. At most one is expected to be set.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EnvironmentDescriptor {
    #[serde(default)]
    pub api_gateway_url: Option<String>,
    #[serde(default)]
    pub dynamo_key: Option<String>,
    #[serde(default)]
    pub opsworks_id: Option<String>,
    #[serde(default)]
    pub squirrel: bool,
}

/// The version source an environment descriptor points at.
#[derive(Debug, Clone, PartialEq)]
pub enum Capability<'a> {
    ApiGateway(&'a str),
    DocumentStore(&'a str),
    FleetManager(&'a str),
    ReleaseChannel,
}

#[cfg(test)]
impl EnvironmentDescriptor {
    pub fn gateway(url: &str) -> Self {
        Self {
            api_gateway_url: Some(url.to_string()),
            ..Self::default()
        }
    }

    pub fn document_store(key: &str) -> Self {
        Self {
            dynamo_key: Some(key.to_string()),
            ..Self::default()
        }
    }

    pub fn fleet_manager(id: &str) -> Self {
        Self {
            opsworks_id: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub fn release_channel() -> Self {
        Self {
            squirrel: true,
            ..Self::default()
        }
    }
}

impl EnvironmentDescriptor {
    /// Classify the descriptor. Keys are tested in a fixed order and the first
    /// populated one wins; configs setting several keys are rejected at load time,
    /// so the order only matters for descriptors built in code.
    pub fn capability(&self) -> Option<Capability<'_>> {
        if let Some(url) = non_empty(&self.api_gateway_url) {
            Some(Capability::ApiGateway(url))
        } else if let Some(key) = non_empty(&self.dynamo_key) {
            Some(Capability::DocumentStore(key))
        } else if let Some(id) = non_empty(&self.opsworks_id) {
            Some(Capability::FleetManager(id))
        } else if self.squirrel {
            Some(Capability::ReleaseChannel)
        } else {
            None
        }
    }

    pub fn populated_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if non_empty(&self.api_gateway_url).is_some() {
            keys.push("api_gateway_url");
        }
        if non_empty(&self.dynamo_key).is_some() {
            keys.push("dynamo_key");
        }
        if non_empty(&self.opsworks_id).is_some() {
            keys.push("opsworks_id");
        }
        if self.squirrel {
            keys.push("squirrel");
        }
        keys
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A build number, or the dev sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildId {
    Dev,
    Number(String),
}

impl BuildId {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == DEV_VERSION {
            Self::Dev
        } else {
            Self::Number(raw.to_string())
        }
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dev => f.write_str(DEV_VERSION),
            Self::Number(n) => f.write_str(n),
        }
    }
}

/// A source-control revision, or the dev sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Dev,
    Commit(String),
}

impl Revision {
    /// First nine characters of the commit, or `DEV_VERSION`.
    pub fn short(&self) -> String {
        match self {
            Self::Dev => DEV_VERSION.to_string(),
            Self::Commit(sha) => sha.chars().take(9).collect(),
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dev => f.write_str(DEV_VERSION),
            Self::Commit(sha) => f.write_str(sha),
        }
    }
}

/// The latest build of an app, as reported by CI.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildInfo {
    pub build: BuildId,
    pub git_url: String,
    pub revision: Revision,
}

/// Per-app result flowing through aggregation and formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub app: Application,
    pub result: Result<T, String>,
}

impl<T> Outcome<T> {
    pub fn from_result(app: &Application, result: Result<T, ResolveError>) -> Self {
        Self {
            app: app.clone(),
            result: result.map_err(|e| e.to_string()),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.result.as_ref().err().map(String::as_str)
    }
}

/// Deployed (or latest) build of one app, with its CI link.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployedBuild {
    pub build: BuildId,
    pub url: String,
}

/// Diff link between two revisions of one app.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub label: String,
    pub url: String,
}

/// A chat attachment (Slack attachment layout).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,
    pub color: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}
