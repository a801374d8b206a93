//! # Diff Aggregator
//!
//! Compares the revisions two environments (or `latest`) run for every app and
//! produces a GitHub compare link per app.

use futures::future::{join3, join_all};

use crate::application::context::CommandContext;
use crate::domain::error::ResolveError;
use crate::domain::types::{Application, BuildId, Comparison, LATEST, Outcome, Revision};

/// Link shown when either side of a comparison is an unreleased build.
pub const DEV_COMPARE_URL: &str = "https://www.youtube.com/watch?v=OHVjs4aobqs";

pub async fn compare(
    ctx: &CommandContext,
    apps: &[Application],
    from: &str,
    to: &str,
) -> Vec<Outcome<Comparison>> {
    join_all(apps.iter().map(|app| async move {
        let result = compare_app(ctx, app, from, to).await;
        if let Err(e) = &result {
            tracing::warn!("Diff {}...{} failed for {}: {}", from, to, app.id, e);
        }
        Outcome::from_result(app, result)
    }))
    .await
}

async fn compare_app(
    ctx: &CommandContext,
    app: &Application,
    from: &str,
    to: &str,
) -> Result<Comparison, ResolveError> {
    let (latest, from_rev, to_rev) = join3(
        ctx.builds.last_build(app),
        deployed_revision(ctx, app, from),
        deployed_revision(ctx, app, to),
    )
    .await;
    let latest = latest?;
    let from_rev = from_rev?.unwrap_or_else(|| latest.revision.clone());
    let to_rev = to_rev?.unwrap_or_else(|| latest.revision.clone());
    Ok(comparison(&latest.git_url, &from_rev, &to_rev))
}

/// Revision running in `env`, or `None` when `env` is `latest` and the
/// latest CI build decides.
async fn deployed_revision(
    ctx: &CommandContext,
    app: &Application,
    env: &str,
) -> Result<Option<Revision>, ResolveError> {
    if env == LATEST {
        return Ok(None);
    }
    match ctx.sources.fetch(app, env).await? {
        BuildId::Dev => Ok(Some(Revision::Dev)),
        build => ctx.builds.revision_for_build(app, &build).await.map(Some),
    }
}

pub fn comparison(git_url: &str, from: &Revision, to: &Revision) -> Comparison {
    match (from, to) {
        (Revision::Commit(a), Revision::Commit(b)) if a == b => Comparison {
            label: "(same commit)".to_string(),
            url: format!("{git_url}/commit/{a}"),
        },
        (Revision::Commit(a), Revision::Commit(b)) => Comparison {
            label: format!("{}...{}", from.short(), to.short()),
            url: format!("{git_url}/compare/{a}...{b}"),
        },
        _ => Comparison {
            label: format!("{}...{}", from.short(), to.short()),
            url: DEV_COMPARE_URL.to_string(),
        },
    }
}
