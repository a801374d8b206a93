//! # Command Handlers
//!
//! Contains specific handler functions for each supported command (e.g., .deployed, .diff).
//! These handlers are invoked by the Router.

pub mod builds;
pub mod diff;
pub mod help;

use anyhow::Result;

use crate::domain::traits::ChatProvider;
use crate::domain::types::Attachment;

/// Send attachments, or a plain line when there was nothing to report.
pub(crate) async fn reply_with(chat: &impl ChatProvider, attachments: &[Attachment]) -> Result<()> {
    if attachments.is_empty() {
        chat.send_message(crate::strings::messages::NO_APPS)
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }
    chat.send_attachments(attachments)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
