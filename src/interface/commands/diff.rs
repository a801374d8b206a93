//! # Diff Command
//!
//! Handles `.diff FROM TO`.

use anyhow::Result;

use super::reply_with;
use crate::application::context::CommandContext;
use crate::application::diff::compare;
use crate::domain::traits::ChatProvider;
use crate::strings::messages;

pub async fn handle_diff(
    ctx: &CommandContext,
    chat: &impl ChatProvider,
    from: &str,
    to: &str,
) -> Result<()> {
    let outcomes = compare(ctx, &ctx.config.apps, from, to).await;
    let attachments = ctx.batcher.make_attachments(
        Some(messages::COMPARE_PRETEXT),
        messages::GITHUB_COLUMN,
        &outcomes,
        |c| messages::compare_link(&c.url, &c.label),
    );
    reply_with(chat, &attachments).await
}
