//! # Command Context
//!
//! Everything one command invocation needs: the configuration snapshot and the
//! collaborators built from it. Constructed fresh per command by the router.

use std::sync::Arc;

use crate::application::attachments::AttachmentBatcher;
use crate::application::circle::CircleCi;
use crate::application::sources::{
    DocumentStoreSource, FleetManagerSource, GatewaySource, ReleaseChannelSource, VersionSources,
};
use crate::domain::config::AppConfig;
use crate::domain::traits::{
    BuildProvider, DocumentStore, FleetManager, HttpTransport, ReleaseChannelStore, VersionSource,
};

/// Long-lived backend clients shared by every command.
#[derive(Clone)]
pub struct Backends {
    pub http: Arc<dyn HttpTransport>,
    pub document_store: Arc<dyn DocumentStore>,
    pub fleet_manager: Arc<dyn FleetManager>,
    pub release_channel: Arc<dyn ReleaseChannelStore>,
}

pub struct CommandContext {
    pub config: AppConfig,
    pub sources: VersionSources,
    pub builds: Arc<dyn BuildProvider>,
    pub batcher: AttachmentBatcher,
}

impl CommandContext {
    pub fn new(config: AppConfig, backends: &Backends) -> Self {
        let release_channel: Arc<dyn VersionSource> = Arc::new(ReleaseChannelSource::new(
            backends.release_channel.clone(),
            config.tables.electron.clone(),
        ));
        let sources = VersionSources {
            gateway: Arc::new(GatewaySource::new(backends.http.clone())),
            document_store: Arc::new(DocumentStoreSource::new(
                backends.document_store.clone(),
                config.tables.dynamo.clone(),
            )),
            fleet_manager: Arc::new(FleetManagerSource::new(backends.fleet_manager.clone())),
            release_channel: release_channel.clone(),
        };
        let builds = Arc::new(CircleCi::new(
            backends.http.clone(),
            config.services.circle.clone(),
            release_channel,
        ));
        let batcher = AttachmentBatcher::new(config.attachments.batch_size);

        Self {
            config,
            sources,
            builds,
            batcher,
        }
    }
}
