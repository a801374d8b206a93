//! In-memory collaborators for tests. Every fake records its calls so tests can
//! assert which backends were (not) touched.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::config::AppConfig;
use crate::domain::error::ResolveError;
use crate::domain::traits::{
    BuildProvider, ChatProvider, ConfigProvider, DocumentStore, FleetApp, FleetAppAttributes,
    FleetManager, HttpTransport, ReleaseChannelStore, ReleaseQuery, ReleaseRecord, VersionSource,
};
use crate::domain::types::{Application, Attachment, BuildId, BuildInfo, DEV_VERSION, Revision};

#[derive(Default)]
pub struct FakeHttp {
    responses: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for FakeHttp {
    async fn get(&self, url: &str, _accept: Option<&str>) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("404 Not Found for {url}"))
    }
}

#[derive(Default)]
pub struct FakeDocumentStore {
    items: HashMap<String, String>,
    requests: Mutex<Vec<(String, String)>>,
}

impl FakeDocumentStore {
    pub fn with(mut self, key: &str, html: &str) -> Self {
        self.items.insert(key.to_string(), html.to_string());
        self
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for FakeDocumentStore {
    async fn get_html(&self, table: &str, key: &str) -> Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((table.to_string(), key.to_string()));
        self.items
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("no item {key} in {table}"))
    }
}

#[derive(Default)]
pub struct FakeFleet {
    apps: HashMap<String, Option<String>>,
    requests: Mutex<Vec<Vec<String>>>,
}

impl FakeFleet {
    pub fn with(mut self, id: &str, document_root: Option<&str>) -> Self {
        self.apps
            .insert(id.to_string(), document_root.map(str::to_string));
        self
    }

    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FleetManager for FakeFleet {
    async fn describe_apps(&self, app_ids: &[String]) -> Result<Vec<FleetApp>> {
        self.requests.lock().unwrap().push(app_ids.to_vec());
        app_ids
            .iter()
            .map(|id| {
                let root = self
                    .apps
                    .get(id)
                    .ok_or_else(|| anyhow!("ResourceNotFoundException: {id}"))?;
                Ok(FleetApp {
                    attributes: FleetAppAttributes {
                        document_root: root.clone(),
                    },
                })
            })
            .collect()
    }
}

pub struct FakeReleases {
    result: Result<Vec<String>, String>,
    queries: Mutex<Vec<ReleaseQuery>>,
}

impl FakeReleases {
    pub fn returning(versions: &[&str]) -> Self {
        Self {
            result: Ok(versions.iter().map(|v| v.to_string()).collect()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<ReleaseQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReleaseChannelStore for FakeReleases {
    async fn query(&self, query: &ReleaseQuery) -> Result<Vec<ReleaseRecord>> {
        self.queries.lock().unwrap().push(query.clone());
        match &self.result {
            Ok(versions) => Ok(versions
                .iter()
                .map(|v| ReleaseRecord { version: v.clone() })
                .collect()),
            Err(message) => Err(anyhow!(message.clone())),
        }
    }
}

/// Version source answering from a table keyed by `(app id, env)`.
#[derive(Default)]
pub struct FakeSource {
    builds: HashMap<(String, String), Result<BuildId, ResolveError>>,
    delays: HashMap<String, u64>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn with(mut self, app: &str, env: &str, build: Result<BuildId, ResolveError>) -> Self {
        self.builds.insert((app.to_string(), env.to_string()), build);
        self
    }

    pub fn build(self, app: &str, env: &str, build: &str) -> Self {
        self.with(app, env, Ok(BuildId::parse(build)))
    }

    /// Delay the answer for `app`, to shuffle completion order.
    pub fn delayed(mut self, app: &str, millis: u64) -> Self {
        self.delays.insert(app.to_string(), millis);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VersionSource for FakeSource {
    async fn fetch_build_version(
        &self,
        app: &Application,
        env: &str,
    ) -> Result<BuildId, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(millis) = self.delays.get(&app.id) {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }
        self.builds
            .get(&(app.id.clone(), env.to_string()))
            .cloned()
            .unwrap_or_else(|| Err(ResolveError::backend("fake", "no stubbed build")))
    }
}

/// CI fake: revisions are the build number repeated five times.
#[derive(Default)]
pub struct FakeBuilds {
    last: HashMap<String, Result<BuildInfo, ResolveError>>,
    delays: HashMap<String, u64>,
    calls: AtomicUsize,
}

impl FakeBuilds {
    pub fn latest(mut self, app: &str, build: &str, revision: &str) -> Self {
        self.last.insert(
            app.to_string(),
            Ok(BuildInfo {
                build: BuildId::parse(build),
                git_url: format!("https://github.com/PatentNavigation/{app}"),
                revision: Revision::Commit(revision.to_string()),
            }),
        );
        self
    }

    pub fn failing(mut self, app: &str, error: ResolveError) -> Self {
        self.last.insert(app.to_string(), Err(error));
        self
    }

    /// Delay `last_build` for `app`, to shuffle completion order.
    pub fn delayed(mut self, app: &str, millis: u64) -> Self {
        self.delays.insert(app.to_string(), millis);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BuildProvider for FakeBuilds {
    fn build_url(&self, app: &Application, build: &BuildId) -> String {
        match build {
            BuildId::Dev => "https://www.youtube.com/watch?v=ih2xubMaZWI".to_string(),
            BuildId::Number(n) => format!("https://circleci.com/gh/PatentNavigation/{}/{}", app.id, n),
        }
    }

    async fn last_build(&self, app: &Application) -> Result<BuildInfo, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(millis) = self.delays.get(&app.id) {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }
        self.last
            .get(&app.id)
            .cloned()
            .unwrap_or_else(|| Err(ResolveError::NoSuccessfulBuild {
                app: app.id.clone(),
                branch: app.branch().to_string(),
            }))
    }

    async fn revision_for_build(
        &self,
        _app: &Application,
        build: &BuildId,
    ) -> Result<Revision, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match build {
            BuildId::Dev => Err(ResolveError::backend(
                "fake",
                format!("Trying to get revision for {DEV_VERSION}!"),
            )),
            BuildId::Number(n) => Ok(Revision::Commit(n.repeat(5))),
        }
    }
}

#[derive(Default)]
pub struct FakeChat {
    pub messages: Mutex<Vec<String>>,
    pub attachments: Mutex<Vec<Vec<Attachment>>>,
}

impl FakeChat {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn attachments(&self) -> Vec<Vec<Attachment>> {
        self.attachments.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for FakeChat {
    async fn send_message(&self, content: &str) -> Result<String, String> {
        let mut messages = self.messages.lock().unwrap();
        messages.push(content.to_string());
        Ok(format!("$event{}", messages.len()))
    }

    async fn send_attachments(&self, attachments: &[Attachment]) -> Result<(), String> {
        self.attachments.lock().unwrap().push(attachments.to_vec());
        Ok(())
    }

    fn room_id(&self) -> String {
        "!test:example.org".to_string()
    }
}

pub struct StaticConfig(pub AppConfig);

impl ConfigProvider for StaticConfig {
    fn load(&self) -> Result<AppConfig> {
        Ok(self.0.clone())
    }
}

/// A configuration with no apps, pointing CI at the public CircleCI endpoints.
pub fn config(apps: Vec<Application>) -> AppConfig {
    let yaml = r#"
services:
  matrix:
    homeserver: https://matrix.example.org
    username: deploybot
    password: secret
  circle:
    token: testtoken
    org: PatentNavigation
tables:
  dynamo: testtable
  electron: testtable
"#;
    let mut config: AppConfig = serde_yaml::from_str(yaml).expect("valid test config");
    config.apps = apps;
    config
}
