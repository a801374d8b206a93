//! # Build Aggregator
//!
//! Answers "which build is deployed in ENV" and "what is the latest build" for a set
//! of apps. Apps resolve concurrently and fail independently; results keep input order.

use futures::future::join_all;

use crate::application::context::CommandContext;
use crate::domain::error::{CommandError, ResolveError};
use crate::domain::types::{Application, BuildId, DeployedBuild, Outcome};

/// Which apps a "latest build" query covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestTarget {
    All,
    App(String),
}

impl LatestTarget {
    pub fn parse(target: &str) -> Self {
        match target.trim() {
            "all" => Self::All,
            id => Self::App(id.to_string()),
        }
    }
}

pub async fn resolve_deployed(
    ctx: &CommandContext,
    apps: &[Application],
    env: &str,
) -> Vec<Outcome<DeployedBuild>> {
    join_all(apps.iter().map(|app| async move {
        let result = deployed_build(ctx, app, env).await;
        log_failure(app, &result);
        Outcome::from_result(app, result)
    }))
    .await
}

async fn deployed_build(
    ctx: &CommandContext,
    app: &Application,
    env: &str,
) -> Result<DeployedBuild, ResolveError> {
    let build = ctx.sources.fetch(app, env).await?;
    Ok(with_url(ctx, app, build))
}

/// Latest successful builds. A named app missing from the catalogue is reported
/// to the caller without touching any backend.
pub async fn resolve_latest(
    ctx: &CommandContext,
    target: &LatestTarget,
) -> Result<Vec<Outcome<DeployedBuild>>, CommandError> {
    let apps: Vec<&Application> = match target {
        LatestTarget::All => ctx.config.apps.iter().collect(),
        LatestTarget::App(id) => vec![
            ctx.config
                .find_app(id)
                .ok_or_else(|| CommandError::UnknownApp(id.clone()))?,
        ],
    };

    Ok(join_all(apps.into_iter().map(|app| async move {
        let result = ctx
            .builds
            .last_build(app)
            .await
            .map(|info| with_url(ctx, app, info.build));
        log_failure(app, &result);
        Outcome::from_result(app, result)
    }))
    .await)
}

fn with_url(ctx: &CommandContext, app: &Application, build: BuildId) -> DeployedBuild {
    let url = ctx.builds.build_url(app, &build);
    DeployedBuild { build, url }
}

fn log_failure<T>(app: &Application, result: &Result<T, ResolveError>) {
    if let Err(e) = result {
        tracing::warn!("Build lookup failed for {}: {}", app.id, e);
    }
}
