//! API gateway source: the deployed build is the body of `{api_gateway_url}/version`.

use async_trait::async_trait;
use std::sync::Arc;

use super::required;
use crate::domain::error::ResolveError;
use crate::domain::traits::{HttpTransport, VersionSource};
use crate::domain::types::{Application, BuildId};

pub struct GatewaySource {
    http: Arc<dyn HttpTransport>,
}

impl GatewaySource {
    pub fn new(http: Arc<dyn HttpTransport>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl VersionSource for GatewaySource {
    async fn fetch_build_version(
        &self,
        app: &Application,
        env: &str,
    ) -> Result<BuildId, ResolveError> {
        let base = required(app, env, "api_gateway_url", |d| d.api_gateway_url.as_deref())?;
        let url = format!("{}/version", base.trim_end_matches('/'));
        tracing::debug!("Fetching {} version for {} from {}", env, app.id, url);

        let body = self
            .http
            .get(&url, None)
            .await
            .map_err(|e| ResolveError::backend("api gateway", format!("{e:#}")))?;
        if body.trim().is_empty() {
            return Err(ResolveError::backend("api gateway", "empty version body"));
        }
        Ok(BuildId::parse(&body))
    }
}
