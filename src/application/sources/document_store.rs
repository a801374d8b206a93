//! Document store source: the deployed build is embedded in the stored `index.html`,
//! inside a `<meta>` tag whose content is URL-encoded JSON carrying `APP.version`.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::required;
use crate::domain::error::ResolveError;
use crate::domain::traits::{DocumentStore, VersionSource};
use crate::domain::types::{Application, BuildId};

const BACKEND: &str = "document store";

pub struct DocumentStoreSource {
    store: Arc<dyn DocumentStore>,
    table: Option<String>,
}

impl DocumentStoreSource {
    pub fn new(store: Arc<dyn DocumentStore>, table: Option<String>) -> Self {
        Self { store, table }
    }
}

#[async_trait]
impl VersionSource for DocumentStoreSource {
    async fn fetch_build_version(
        &self,
        app: &Application,
        env: &str,
    ) -> Result<BuildId, ResolveError> {
        let key = required(app, env, "dynamo_key", |d| d.dynamo_key.as_deref())?;
        let table = self
            .table
            .as_deref()
            .ok_or_else(|| ResolveError::backend(BACKEND, "no table configured"))?;
        tracing::debug!("Fetching {} html for {} from {}:{}", env, app.id, table, key);

        let html = self
            .store
            .get_html(table, key)
            .await
            .map_err(|e| ResolveError::backend(BACKEND, format!("{e:#}")))?;

        let meta_name = app.meta_name();
        let content = find_meta_content(&html, &meta_name).ok_or_else(|| {
            ResolveError::backend(
                BACKEND,
                format!("Unable to find meta tag with name '{meta_name}' in {key} HTML"),
            )
        })?;
        let version = app_version(&content).map_err(|e| ResolveError::backend(BACKEND, e))?;
        build_from_version(&version)
            .map(BuildId::parse)
            .map_err(|e| ResolveError::backend(BACKEND, e))
    }
}

fn meta_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta regex"))
}

fn attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("valid attribute regex")
    })
}

/// Content attribute of the first `<meta name="{name}">` tag.
fn find_meta_content(html: &str, name: &str) -> Option<String> {
    meta_regex().find_iter(html).find_map(|tag| {
        let attrs: HashMap<String, String> = attr_regex()
            .captures_iter(tag.as_str())
            .map(|c| {
                let value = c.get(2).or_else(|| c.get(3)).map_or("", |m| m.as_str());
                (c[1].to_ascii_lowercase(), value.to_string())
            })
            .collect();
        match attrs.get("name") {
            Some(n) if n == name => attrs.get("content").cloned(),
            _ => None,
        }
    })
}

/// `APP.version` out of the URL-encoded JSON config.
fn app_version(content: &str) -> Result<String, String> {
    let decoded = urlencoding::decode(content).map_err(|e| format!("bad meta content: {e}"))?;
    let config: serde_json::Value =
        serde_json::from_str(&decoded).map_err(|e| format!("bad meta JSON: {e}"))?;
    config
        .pointer("/APP/version")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| "meta config has no APP.version".to_string())
}

/// Both `3.1.0-123` and the legacy `123-master-sha+sha` carry the build before the first `-`.
fn build_from_version(version: &str) -> Result<&str, String> {
    match version.split_once('-') {
        Some((build, _)) if !build.is_empty() => Ok(build),
        _ => Err(format!("malformed version '{version}'")),
    }
}
