//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for the Matrix protocol using the `matrix_sdk`.
//! Attachments go out as a single markdown message.

use crate::domain::traits::ChatProvider;
use crate::domain::types::Attachment;
use crate::infrastructure::render::attachments_to_markdown;
use async_trait::async_trait;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::events::room::message::RoomMessageEventContent;

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<String, String> {
        tracing::info!("Bot sending message to {}: {}", self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|resp| resp.event_id.to_string())
            .map_err(|e| e.to_string())
    }

    async fn send_attachments(&self, attachments: &[Attachment]) -> Result<(), String> {
        tracing::info!(
            "Bot sending {} attachment(s) to {}",
            attachments.len(),
            self.room_id()
        );
        self.send_message(&attachments_to_markdown(attachments))
            .await
            .map(|_| ())
    }
}
