//! # App Type Resolver
//!
//! Decides which version source applies to an app in a given environment.

use crate::domain::types::{Application, Capability};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppType {
    ApiGateway,
    DocumentStore,
    FleetManager,
    ReleaseChannel,
    Unknown,
}

impl AppType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppType::ApiGateway => "apiGateway",
            AppType::DocumentStore => "dynamo",
            AppType::FleetManager => "opsworks",
            AppType::ReleaseChannel => "squirrel",
            AppType::Unknown => "unknown",
        }
    }
}

/// Classify `app` for `env`. An absent environment is `Unknown`. When a descriptor
/// sets several keys the first of gateway, document store, fleet manager, release
/// channel wins; that tie-break is deterministic but not a supported configuration.
pub fn app_type(app: &Application, env: &str) -> AppType {
    match app.environments.get(env).and_then(|d| d.capability()) {
        Some(Capability::ApiGateway(_)) => AppType::ApiGateway,
        Some(Capability::DocumentStore(_)) => AppType::DocumentStore,
        Some(Capability::FleetManager(_)) => AppType::FleetManager,
        Some(Capability::ReleaseChannel) => AppType::ReleaseChannel,
        None => AppType::Unknown,
    }
}
