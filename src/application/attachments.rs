//! # Attachment Batcher
//!
//! Chat transports truncate long messages, so per-app outcomes are split across
//! several attachments of at most `batch_size` rows each.

use crate::domain::types::{Attachment, Field, Outcome};

pub struct AttachmentBatcher {
    batch_size: usize,
}

impl Default for AttachmentBatcher {
    fn default() -> Self {
        Self::new(10)
    }
}

impl AttachmentBatcher {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// One attachment per batch; only the first carries `pretext`.
    pub fn make_attachments<T>(
        &self,
        pretext: Option<&str>,
        value_title: &str,
        records: &[Outcome<T>],
        link: impl Fn(&T) -> String,
    ) -> Vec<Attachment> {
        records
            .chunks(self.batch_size)
            .enumerate()
            .map(|(i, batch)| {
                let pretext = if i == 0 { pretext } else { None };
                make_attachment(pretext, value_title, batch, &link)
            })
            .collect()
    }
}

fn make_attachment<T>(
    pretext: Option<&str>,
    value_title: &str,
    batch: &[Outcome<T>],
    link: &impl Fn(&T) -> String,
) -> Attachment {
    let ids: Vec<&str> = batch.iter().map(|o| o.app.id.as_str()).collect();
    let values: Vec<String> = batch
        .iter()
        .map(|o| match &o.result {
            Ok(payload) => link(payload),
            Err(_) => "ERROR".to_string(),
        })
        .collect();

    let mut fields = vec![
        Field {
            title: "App".to_string(),
            value: ids.join("\n"),
            short: true,
        },
        Field {
            title: value_title.to_string(),
            value: values.join("\n"),
            short: true,
        },
    ];
    fields.extend(batch.iter().filter_map(|o| {
        o.error().map(|message| Field {
            title: format!("{} error", o.app.id),
            value: message.to_string(),
            short: false,
        })
    }));

    Attachment {
        pretext: pretext.map(str::to_string),
        color: "good".to_string(),
        fields,
    }
}
