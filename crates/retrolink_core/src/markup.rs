//! Per-route markup resources.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::fallback::FallbackTable;
use crate::route::RouteId;

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("markup for route `{0}` not found")]
    NotFound(RouteId),

    #[error("markup request for route `{route}` returned status {status}")]
    Status { route: RouteId, status: u16 },

    #[error("markup for route `{route}` could not be read: {cause}")]
    Io {
        route: RouteId,
        cause: std::io::Error,
    },
}

#[async_trait]
pub trait MarkupSource: Send + Sync {
    async fn fetch(&self, route: &RouteId) -> Result<String, MarkupError>;
}

/// Reads `<root>/<route>/<route>.html`.
#[derive(Clone, Debug)]
pub struct FsMarkupSource {
    root: PathBuf,
}

impl FsMarkupSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, route: &RouteId) -> PathBuf {
        markup_path(&self.root, route)
    }
}

pub fn markup_path(root: &Path, route: &RouteId) -> PathBuf {
    root.join(route.as_str()).join(format!("{}.html", route.as_str()))
}

#[async_trait]
impl MarkupSource for FsMarkupSource {
    async fn fetch(&self, route: &RouteId) -> Result<String, MarkupError> {
        // Route names come from the URL; keep them inside the markup root
        if route.as_str().contains(['/', '\\']) || route.as_str().contains("..") {
            return Err(MarkupError::NotFound(route.clone()));
        }

        let path = self.path_for(route);
        match tokio::fs::read_to_string(&path).await {
            Ok(markup) => Ok(markup),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MarkupError::NotFound(route.clone()))
            }
            Err(e) => Err(MarkupError::Io {
                route: route.clone(),
                cause: e,
            }),
        }
    }
}

/// Where a route's markup would come from if navigated to now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkupAvailability {
    Fetchable,
    Fallback,
    Missing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteAudit {
    pub route: RouteId,
    pub availability: MarkupAvailability,
    pub detail: Option<String>,
}

/// Probe every route's markup resource and report which ones would fall back.
pub async fn audit_routes<'a, I>(
    source: &dyn MarkupSource,
    fallback: &FallbackTable,
    routes: I,
) -> Vec<RouteAudit>
where
    I: IntoIterator<Item = &'a RouteId>,
{
    let mut report = Vec::new();
    for route in routes {
        let audit = match source.fetch(route).await {
            Ok(_) => RouteAudit {
                route: route.clone(),
                availability: MarkupAvailability::Fetchable,
                detail: None,
            },
            Err(e) => RouteAudit {
                route: route.clone(),
                availability: if fallback.lookup(route).is_some() {
                    MarkupAvailability::Fallback
                } else {
                    MarkupAvailability::Missing
                },
                detail: Some(e.to_string()),
            },
        };
        report.push(audit);
    }
    report
}
