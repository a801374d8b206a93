//! # CircleCI Build Provider
//!
//! Talks to the CircleCI v1 project API to find an app's latest successful build and
//! the revision behind a build number, and builds links to the CircleCI web UI.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::application::resolver::{AppType, app_type};
use crate::domain::config::CircleConfig;
use crate::domain::error::ResolveError;
use crate::domain::traits::{BuildProvider, HttpTransport, VersionSource};
use crate::domain::types::{Application, BuildId, BuildInfo, Revision};

const BACKEND: &str = "circle";

/// Link shown instead of a CI build for unreleased deployments.
pub const DEV_BUILD_URL: &str = "https://www.youtube.com/watch?v=ih2xubMaZWI";

#[derive(Debug, Deserialize)]
struct CircleBuild {
    #[serde(default)]
    build_num: Option<u64>,
    #[serde(default)]
    vcs_revision: Option<String>,
    #[serde(default)]
    vcs_url: Option<String>,
}

/// Single-build lookups have been seen to answer with a one-element list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<CircleBuild>),
    One(CircleBuild),
}

impl OneOrMany {
    fn into_first(self) -> Option<CircleBuild> {
        match self {
            OneOrMany::One(build) => Some(build),
            OneOrMany::Many(builds) => builds.into_iter().next(),
        }
    }
}

impl CircleBuild {
    fn revision(&self) -> Result<Revision, ResolveError> {
        self.vcs_revision
            .clone()
            .map(Revision::Commit)
            .ok_or_else(|| ResolveError::backend(BACKEND, "build has no vcs_revision"))
    }

    fn git_url(&self) -> Result<String, ResolveError> {
        self.vcs_url
            .clone()
            .ok_or_else(|| ResolveError::backend(BACKEND, "build has no vcs_url"))
    }
}

pub struct CircleCi {
    http: Arc<dyn HttpTransport>,
    settings: CircleConfig,
    release_channel: Arc<dyn VersionSource>,
}

impl CircleCi {
    pub fn new(
        http: Arc<dyn HttpTransport>,
        settings: CircleConfig,
        release_channel: Arc<dyn VersionSource>,
    ) -> Self {
        Self {
            http,
            settings,
            release_channel,
        }
    }

    fn project_path(&self, app: &Application) -> String {
        app.circle_url
            .clone()
            .unwrap_or_else(|| format!("{}/{}", self.settings.org, app.id))
    }

    async fn api_get<T: DeserializeOwned>(&self, path: &str, query: &str) -> Result<T, ResolveError> {
        tracing::debug!("CircleCI GET {}{}", path, query);
        let url = format!(
            "{}{}?circle-token={}{}",
            self.settings.api_root(), path, self.settings.token, query
        );
        let body = self
            .http
            .get(&url, Some("application/json"))
            .await
            .map_err(|e| ResolveError::backend(BACKEND, format!("{e:#}")))?;
        serde_json::from_str(&body)
            .map_err(|e| ResolveError::backend(BACKEND, format!("unexpected response for {path}: {e}")))
    }

    async fn get_build(&self, app: &Application, number: &str) -> Result<CircleBuild, ResolveError> {
        let path = format!("{}/{}", self.project_path(app), number);
        self.api_get::<OneOrMany>(&path, "")
            .await?
            .into_first()
            .ok_or_else(|| ResolveError::backend(BACKEND, format!("build {number} of {} not found", app.id)))
    }
}

#[async_trait]
impl BuildProvider for CircleCi {
    fn build_url(&self, app: &Application, build: &BuildId) -> String {
        match build {
            BuildId::Dev => DEV_BUILD_URL.to_string(),
            BuildId::Number(n) => format!("{}{}/{}", self.settings.web_root(), self.project_path(app), n),
        }
    }

    async fn last_build(&self, app: &Application) -> Result<BuildInfo, ResolveError> {
        // Desktop apps are released from stage, so the latest build is the one stage reports.
        if app_type(app, "stage") == AppType::ReleaseChannel {
            let build = self.release_channel.fetch_build_version(app, "stage").await?;
            let BuildId::Number(number) = &build else {
                return Err(ResolveError::backend(
                    BACKEND,
                    format!("release channel reported {build} for {}", app.id),
                ));
            };
            let found = self.get_build(app, number).await?;
            return Ok(BuildInfo {
                revision: found.revision()?,
                git_url: found.git_url()?,
                build,
            });
        }

        let branch = app.branch();
        let path = format!(
            "{}/tree/{}",
            self.project_path(app),
            urlencoding::encode(branch)
        );
        let builds: Vec<CircleBuild> = self.api_get(&path, "&limit=1&filter=successful").await?;
        let latest = builds
            .into_iter()
            .next()
            .ok_or_else(|| ResolveError::NoSuccessfulBuild {
                app: app.id.clone(),
                branch: branch.to_string(),
            })?;
        let number = latest
            .build_num
            .ok_or_else(|| ResolveError::backend(BACKEND, "build has no build_num"))?;

        Ok(BuildInfo {
            build: BuildId::Number(number.to_string()),
            git_url: latest.git_url()?,
            revision: latest.revision()?,
        })
    }

    async fn revision_for_build(
        &self,
        app: &Application,
        build: &BuildId,
    ) -> Result<Revision, ResolveError> {
        match build {
            BuildId::Dev => Ok(Revision::Dev),
            BuildId::Number(n) => self.get_build(app, n).await?.revision(),
        }
    }
}
