//! # Build Commands
//!
//! Handles `.deployed in ENV` and `.builds for TARGET`.

use anyhow::Result;

use super::reply_with;
use crate::application::builds::{LatestTarget, resolve_deployed, resolve_latest};
use crate::application::context::CommandContext;
use crate::domain::traits::ChatProvider;
use crate::domain::types::DeployedBuild;
use crate::strings::messages;

fn render(build: &DeployedBuild) -> String {
    messages::build_link(&build.url, &build.build.to_string())
}

pub async fn handle_deployed(
    ctx: &CommandContext,
    chat: &impl ChatProvider,
    env: &str,
) -> Result<()> {
    let outcomes = resolve_deployed(ctx, &ctx.config.apps, env).await;
    let pretext = messages::deployed_pretext(env);
    let attachments = ctx.batcher.make_attachments(
        Some(&pretext),
        messages::BUILD_COLUMN,
        &outcomes,
        render,
    );
    reply_with(chat, &attachments).await
}

pub async fn handle_builds(
    ctx: &CommandContext,
    chat: &impl ChatProvider,
    target: &str,
) -> Result<()> {
    let outcomes = match resolve_latest(ctx, &LatestTarget::parse(target)).await {
        Ok(outcomes) => outcomes,
        Err(e) => {
            chat.send_message(&e.to_string())
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            return Ok(());
        }
    };
    let attachments = ctx.batcher.make_attachments(
        Some(messages::LATEST_BUILDS_PRETEXT),
        messages::BUILD_COLUMN,
        &outcomes,
        render,
    );
    reply_with(chat, &attachments).await
}
