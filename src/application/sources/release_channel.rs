//! Release-channel source for desktop apps. All platform builds are released in
//! lockstep, so the darwin record stands in for the app.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::error::ResolveError;
use crate::domain::traits::{ReleaseChannelStore, ReleaseFlag, ReleaseQuery, VersionSource};
use crate::domain::types::{Application, BuildId};

const BACKEND: &str = "release channel";

pub struct ReleaseChannelSource {
    store: Arc<dyn ReleaseChannelStore>,
    table: Option<String>,
}

impl ReleaseChannelSource {
    pub fn new(store: Arc<dyn ReleaseChannelStore>, table: Option<String>) -> Self {
        Self { store, table }
    }
}

#[async_trait]
impl VersionSource for ReleaseChannelSource {
    async fn fetch_build_version(
        &self,
        app: &Application,
        env: &str,
    ) -> Result<BuildId, ResolveError> {
        if !app.environment(env)?.squirrel {
            return Err(ResolveError::missing_capability(&app.id, "squirrel"));
        }
        let app_name = app
            .app_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ResolveError::missing_capability(&app.id, "app_name"))?;
        let table = self
            .table
            .as_deref()
            .ok_or_else(|| ResolveError::backend(BACKEND, "no table configured"))?;

        let query = ReleaseQuery {
            table: table.to_string(),
            name: format!("{app_name}_darwin_x64"),
            flag: ReleaseFlag::for_env(env),
            newest_first: true,
        };
        tracing::debug!("Querying release channel {:?}", query);

        let records = self
            .store
            .query(&query)
            .await
            .map_err(|e| ResolveError::backend(BACKEND, format!("{e:#}")))?;
        let record = records
            .first()
            .ok_or_else(|| ResolveError::backend(BACKEND, format!("no releases of {}", query.name)))?;
        build_from_release(&record.version)
            .map(BuildId::parse)
            .map_err(|e| ResolveError::backend(BACKEND, e))
    }
}

/// Release versions look like `1.2.3-r12345`; the build is the part after `-r`.
fn build_from_release(version: &str) -> Result<&str, String> {
    version
        .split('-')
        .nth(1)
        .and_then(|s| s.strip_prefix('r'))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("malformed release version '{version}'"))
}
