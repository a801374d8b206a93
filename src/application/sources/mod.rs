//! # Version Sources
//!
//! One module per backend that can report the build an app runs in an environment.
//! `VersionSources` maps an `AppType` to the matching implementation.

mod document_store;
mod fleet;
mod gateway;
mod release_channel;

pub use document_store::DocumentStoreSource;
pub use fleet::FleetManagerSource;
pub use gateway::GatewaySource;
pub use release_channel::ReleaseChannelSource;

use std::sync::Arc;

use crate::application::resolver::{AppType, app_type};
use crate::domain::error::ResolveError;
use crate::domain::traits::VersionSource;
use crate::domain::types::{Application, BuildId, EnvironmentDescriptor};

#[derive(Clone)]
pub struct VersionSources {
    pub gateway: Arc<dyn VersionSource>,
    pub document_store: Arc<dyn VersionSource>,
    pub fleet_manager: Arc<dyn VersionSource>,
    pub release_channel: Arc<dyn VersionSource>,
}

impl VersionSources {
    pub fn for_type(&self, app_type: AppType) -> Option<&Arc<dyn VersionSource>> {
        match app_type {
            AppType::ApiGateway => Some(&self.gateway),
            AppType::DocumentStore => Some(&self.document_store),
            AppType::FleetManager => Some(&self.fleet_manager),
            AppType::ReleaseChannel => Some(&self.release_channel),
            AppType::Unknown => None,
        }
    }

    /// Check the environment exists, pick the source for it and fetch its build.
    pub async fn fetch(&self, app: &Application, env: &str) -> Result<BuildId, ResolveError> {
        app.environment(env)?;
        let kind = app_type(app, env);
        let source = self.for_type(kind).ok_or(ResolveError::UnknownAppType)?;
        tracing::debug!("Fetching {} build of {} from {}", env, app.id, kind.as_str());
        source.fetch_build_version(app, env).await
    }
}

/// Shared precondition of every source: the environment exists and sets `field`.
fn required<'a>(
    app: &'a Application,
    env: &str,
    capability: &str,
    field: impl Fn(&'a EnvironmentDescriptor) -> Option<&'a str>,
) -> Result<&'a str, ResolveError> {
    let descriptor = app.environment(env)?;
    field(descriptor)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ResolveError::missing_capability(&app.id, capability))
}
