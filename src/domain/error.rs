//! Error types for version resolution and command handling.

use thiserror::Error;

/// Errors produced while resolving a single app. Aggregators turn these into
/// per-app error outcomes; they never abort a whole command.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    /// The app has no configuration for the requested environment.
    #[error("{app} doesn't have info for environment {env}")]
    MissingEnvironment { app: String, env: String },

    /// No version source matches the app's environment descriptor.
    #[error("Unable to determine app method")]
    UnknownAppType,

    /// The environment lacks the field its version source needs.
    #[error("{app} doesn't have a {capability}")]
    MissingCapabilityValue { app: String, capability: String },

    /// CI returned no successful build for the branch.
    #[error("No successful builds of {app} on {branch}")]
    NoSuccessfulBuild { app: String, branch: String },

    /// Transport or parsing failure from an external system.
    #[error("{backend} error: {message}")]
    Backend { backend: String, message: String },
}

impl ResolveError {
    pub fn backend(backend: &str, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.to_string(),
            message: message.into(),
        }
    }

    pub fn missing_capability(app: &str, capability: &str) -> Self {
        Self::MissingCapabilityValue {
            app: app.to_string(),
            capability: capability.to_string(),
        }
    }
}

/// Errors without app context, reported directly as a short reply.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("I don't know about an app named {0}")]
    UnknownApp(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ResolveError::MissingEnvironment {
            app: "my-app".to_string(),
            env: "prod".to_string(),
        };
        assert_eq!(err.to_string(), "my-app doesn't have info for environment prod");
        assert_eq!(
            ResolveError::UnknownAppType.to_string(),
            "Unable to determine app method"
        );
        assert_eq!(
            ResolveError::backend("circle", "404 Not Found").to_string(),
            "circle error: 404 Not Found"
        );
        assert_eq!(
            CommandError::UnknownApp("fooblyfoo".to_string()).to_string(),
            "I don't know about an app named fooblyfoo"
        );
    }
}
