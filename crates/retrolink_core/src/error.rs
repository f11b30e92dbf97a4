use thiserror::Error;

use crate::route::RouteId;

/// Failures while turning a route into a running view module.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no module registered for route `{0}`")]
    Unregistered(RouteId),

    #[error("failed to load module for route `{route}`: {cause:#}")]
    Module { route: RouteId, cause: anyhow::Error },

    #[error("module for route `{route}` failed to initialize: {cause:#}")]
    Init { route: RouteId, cause: anyhow::Error },
}

impl LoadError {
    /// Init failures leave the injected markup usable.
    pub fn is_init(&self) -> bool {
        matches!(self, LoadError::Init { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {cause}")]
    Io {
        path: String,
        cause: std::io::Error,
    },

    #[error("invalid config {path}: {cause}")]
    Parse {
        path: String,
        cause: toml::de::Error,
    },
}
