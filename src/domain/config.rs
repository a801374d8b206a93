//! # Configuration
//!
//! Manages the loading and parsing of the bot's configuration file (`config.yaml`).
//! Defines the structs for chat credentials, CI settings, backend tables and the app catalogue.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::domain::types::Application;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub tables: TablesConfig,
    #[serde(default)]
    pub attachments: AttachmentsConfig,
    #[serde(default)]
    pub apps: Vec<Application>,
}

impl AppConfig {
    /// Read, parse and validate a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject catalogues the resolver could only answer by tie-breaking:
    /// duplicate app ids and environments with more than one capability key.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for app in &self.apps {
            if !seen.insert(app.id.as_str()) {
                bail!("Duplicate app id '{}' in configuration", app.id);
            }
            for (env, descriptor) in &app.environments {
                let populated = descriptor.populated_keys();
                if populated.len() > 1 {
                    bail!(
                        "App '{}' environment '{}' sets more than one version source: {}",
                        app.id,
                        env,
                        populated.join(", ")
                    );
                }
            }
        }
        Ok(())
    }

    pub fn find_app(&self, id: &str) -> Option<&Application> {
        self.apps.iter().find(|app| app.id == id)
    }
}

/// Configuration for the connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
    pub circle: CircleConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub username: String,
    pub password: String,
    pub homeserver: String,
}

/// CircleCI project settings.
#[derive(Debug, Deserialize, Clone)]
pub struct CircleConfig {
    pub token: String,
    /// Owner used to derive `{org}/{app id}` when an app has no `circle_url`.
    pub org: String,
    #[serde(default = "default_circle_api_url")]
    pub api_url: String,
    #[serde(default = "default_circle_web_url")]
    pub web_url: String,
}

impl CircleConfig {
    /// `api_url` with exactly one trailing `/`, ready for a project path.
    pub fn api_root(&self) -> String {
        with_trailing_slash(&self.api_url)
    }

    /// `web_url` with exactly one trailing `/`.
    pub fn web_root(&self) -> String {
        with_trailing_slash(&self.web_url)
    }
}

fn with_trailing_slash(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

fn default_circle_api_url() -> String {
    "https://circleci.com/api/v1/project/".to_string()
}

fn default_circle_web_url() -> String {
    "https://circleci.com/gh/".to_string()
}

/// Table names for the SDK-backed stores.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct TablesConfig {
    /// Document store table holding the rendered HTML per deployment key.
    #[serde(default)]
    pub dynamo: Option<String>,
    /// Release-channel table holding desktop release records.
    #[serde(default)]
    pub electron: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AttachmentsConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for AttachmentsConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

fn default_batch_size() -> usize {
    10
}
