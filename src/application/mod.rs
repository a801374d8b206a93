//! # Application Layer
//!
//! Contains the core logic of the bot: resolving deployed builds per app,
//! talking to CI, computing diffs, batching results and routing commands.

pub mod attachments;
pub mod builds;
pub mod circle;
pub mod context;
pub mod diff;
pub mod resolver;
pub mod router;
pub mod sources;

#[cfg(test)]
pub mod fakes;
