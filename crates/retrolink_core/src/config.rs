//! Loader and dev-server configuration (`retrolink.toml`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::route::RouteId;

pub const DEFAULT_CONFIG_FILE: &str = "retrolink.toml";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoaderConfig {
    pub default_route: String,
    pub login_route: String,
    pub privileged_routes: Vec<String>,
    pub markup_root: PathBuf,
    /// Post-navigation wiring for the auth and games views.
    pub legacy_shims: bool,
    pub auth_retry_delay_ms: u64,
    pub auth_form_selector: String,
    pub games_form_selector: String,
    pub server: ServerConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub root: PathBuf,
    pub port: u16,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            default_route: "home".to_string(),
            login_route: "auth".to_string(),
            privileged_routes: vec!["admin".to_string()],
            markup_root: PathBuf::from("./modules"),
            legacy_shims: true,
            auth_retry_delay_ms: 1500,
            auth_form_selector: "form".to_string(),
            games_form_selector: "#game-form".to_string(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            port: 5173,
        }
    }
}

impl LoaderConfig {
    pub fn from_toml(source: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|cause| ConfigError::Parse {
            path: origin.to_string(),
            cause,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|cause| ConfigError::Io {
            path: path.display().to_string(),
            cause,
        })?;
        Self::from_toml(&source, &path.display().to_string())
    }

    /// Defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn default_route(&self) -> RouteId {
        RouteId::new(self.default_route.as_str())
    }

    pub fn login_route(&self) -> RouteId {
        RouteId::new(self.login_route.as_str())
    }

    pub fn privileged_routes(&self) -> impl Iterator<Item = RouteId> + '_ {
        self.privileged_routes.iter().map(|r| RouteId::new(r.as_str()))
    }

    /// `markup_root` relative to the server root unless absolute.
    pub fn resolved_markup_root(&self) -> PathBuf {
        if self.markup_root.is_absolute() {
            self.markup_root.clone()
        } else {
            self.server.root.join(&self.markup_root)
        }
    }

    pub fn auth_retry_delay(&self) -> Duration {
        Duration::from_millis(self.auth_retry_delay_ms)
    }
}
