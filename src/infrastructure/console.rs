//! # Console Chat
//!
//! `ChatProvider` that prints replies to stdout. Used by the one-shot `ask` mode.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::traits::ChatProvider;
use crate::domain::types::Attachment;
use crate::infrastructure::render::attachments_to_markdown;

#[derive(Default)]
pub struct ConsoleChat {
    sent: AtomicUsize,
    json: bool,
}

impl ConsoleChat {
    /// Print attachments as JSON (the Slack payload shape) instead of markdown.
    pub fn json(json: bool) -> Self {
        Self {
            sent: AtomicUsize::new(0),
            json,
        }
    }
}

#[async_trait]
impl ChatProvider for ConsoleChat {
    async fn send_message(&self, content: &str) -> Result<String, String> {
        println!("{content}");
        let n = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("console-{n}"))
    }

    async fn send_attachments(&self, attachments: &[Attachment]) -> Result<(), String> {
        let body = if self.json {
            serde_json::to_string_pretty(attachments).map_err(|e| e.to_string())?
        } else {
            attachments_to_markdown(attachments)
        };
        self.send_message(&body).await.map(|_| ())
    }

    fn room_id(&self) -> String {
        "console".to_string()
    }
}
