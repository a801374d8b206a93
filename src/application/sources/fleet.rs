//! Fleet-manager source: the deployed build is the app's `DocumentRoot` attribute.

use async_trait::async_trait;
use std::sync::Arc;

use super::required;
use crate::domain::error::ResolveError;
use crate::domain::traits::{FleetManager, VersionSource};
use crate::domain::types::{Application, BuildId};

const BACKEND: &str = "fleet manager";

pub struct FleetManagerSource {
    fleet: Arc<dyn FleetManager>,
}

impl FleetManagerSource {
    pub fn new(fleet: Arc<dyn FleetManager>) -> Self {
        Self { fleet }
    }
}

#[async_trait]
impl VersionSource for FleetManagerSource {
    async fn fetch_build_version(
        &self,
        app: &Application,
        env: &str,
    ) -> Result<BuildId, ResolveError> {
        let fleet_id = required(app, env, "opsworks_id", |d| d.opsworks_id.as_deref())?;
        tracing::debug!("Describing fleet app {} for {} {}", fleet_id, app.id, env);

        let apps = self
            .fleet
            .describe_apps(&[fleet_id.to_string()])
            .await
            .map_err(|e| ResolveError::backend(BACKEND, format!("{e:#}")))?;
        apps.first()
            .and_then(|a| a.attributes.document_root.as_deref())
            .map(BuildId::parse)
            .ok_or_else(|| ResolveError::backend(BACKEND, format!("no DocumentRoot for app {fleet_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fakes::FakeFleet;
    use crate::domain::types::EnvironmentDescriptor;

    fn app() -> Application {
        Application::new("opsworks-app")
            .with_env("stage", EnvironmentDescriptor::fleet_manager("1111"))
            .with_env("prod", EnvironmentDescriptor::fleet_manager("2222"))
            .with_env("dev", EnvironmentDescriptor::release_channel())
    }

    #[tokio::test]
    async fn test_reads_document_root() {
        let fleet = Arc::new(FakeFleet::default().with("1111", Some("123")).with("2222", Some("120")));
        let source = FleetManagerSource::new(fleet.clone());

        assert_eq!(
            source.fetch_build_version(&app(), "stage").await.unwrap(),
            BuildId::Number("123".to_string())
        );
        assert_eq!(
            source.fetch_build_version(&app(), "prod").await.unwrap(),
            BuildId::Number("120".to_string())
        );
        assert_eq!(fleet.requests(), vec![vec!["1111".to_string()], vec!["2222".to_string()]]);
    }

    #[tokio::test]
    async fn test_errors() {
        let fleet = Arc::new(FakeFleet::default().with("2222", None));
        let source = FleetManagerSource::new(fleet.clone());

        // unknown id: the fake reports a transport failure
        let err = source.fetch_build_version(&app(), "stage").await.unwrap_err();
        assert!(matches!(err, ResolveError::Backend { .. }));

        let err = source.fetch_build_version(&app(), "prod").await.unwrap_err();
        assert!(err.to_string().contains("DocumentRoot"));

        let err = source.fetch_build_version(&app(), "dev").await.unwrap_err();
        assert!(matches!(err, ResolveError::MissingCapabilityValue { .. }));
        let err = source.fetch_build_version(&app(), "qa").await.unwrap_err();
        assert!(matches!(err, ResolveError::MissingEnvironment { .. }));
        assert_eq!(fleet.requests().len(), 2);
    }
}
