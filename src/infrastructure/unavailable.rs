//! # Unconfigured Backends
//!
//! Stand-ins for the SDK-backed stores (document store, fleet manager and release
//! channel) when no client is wired in. Every call fails, which surfaces as a
//! per-app error in replies while the rest of the bot keeps working.

use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::domain::traits::{
    DocumentStore, FleetApp, FleetManager, ReleaseChannelStore, ReleaseQuery, ReleaseRecord,
};

#[derive(Default, Clone)]
pub struct UnconfiguredBackend;

#[async_trait]
impl DocumentStore for UnconfiguredBackend {
    async fn get_html(&self, table: &str, key: &str) -> Result<String> {
        tracing::debug!("Document store lookup {}/{} with no client", table, key);
        bail!("document store client is not configured")
    }
}

#[async_trait]
impl FleetManager for UnconfiguredBackend {
    async fn describe_apps(&self, _app_ids: &[String]) -> Result<Vec<FleetApp>> {
        bail!("fleet manager client is not configured")
    }
}

#[async_trait]
impl ReleaseChannelStore for UnconfiguredBackend {
    async fn query(&self, query: &ReleaseQuery) -> Result<Vec<ReleaseRecord>> {
        tracing::debug!(
            "Release query {} in {} (flag {}) with no client",
            query.name,
            query.table,
            query.flag.map(|f| f.attribute()).unwrap_or("none")
        );
        bail!("release channel client is not configured")
    }
}
