//! # Help Command
//!
//! Answers `.help` with the list of deploybot commands
//! (`.deployed`, `.builds`, `.diff`). Needs no configuration.

use anyhow::Result;

use crate::domain::traits::ChatProvider;
use crate::strings::help;

pub async fn handle_help(chat: &impl ChatProvider) -> Result<()> {
    chat.send_message(help::MAIN)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
