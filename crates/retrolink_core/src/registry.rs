//! Module registration table: route name to a lazily invoked loader.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::lifecycle::ModuleHandle;
use crate::route::RouteId;

/// Routes every deployment of the site registers.
pub const CORE_ROUTES: [&str; 6] = ["home", "games", "auth", "admin", "chat", "profile"];

#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load(&self) -> anyhow::Result<ModuleHandle>;
}

struct FnLoader<F>(F);

#[async_trait]
impl<F, Fut> ModuleLoader for FnLoader<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<ModuleHandle>> + Send + 'static,
{
    async fn load(&self) -> anyhow::Result<ModuleHandle> {
        (self.0)().await
    }
}

#[derive(Clone, Default)]
pub struct ModuleRegistry {
    loaders: HashMap<RouteId, Arc<dyn ModuleLoader>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        route: impl Into<RouteId>,
        loader: Arc<dyn ModuleLoader>,
    ) -> &mut Self {
        self.loaders.insert(route.into(), loader);
        self
    }

    pub fn register_fn<F, Fut>(&mut self, route: impl Into<RouteId>, load: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<ModuleHandle>> + Send + 'static,
    {
        self.register(route, Arc::new(FnLoader(load)))
    }

    pub fn contains(&self, route: &RouteId) -> bool {
        self.loaders.contains_key(route)
    }

    pub fn missing_core_routes(&self) -> Vec<&'static str> {
        CORE_ROUTES
            .into_iter()
            .filter(|r| !self.loaders.contains_key(*r))
            .collect()
    }

    pub async fn resolve(&self, route: &RouteId) -> Result<ModuleHandle, LoadError> {
        let loader = self
            .loaders
            .get(route)
            .ok_or_else(|| LoadError::Unregistered(route.clone()))?;

        loader.load().await.map_err(|cause| LoadError::Module {
            route: route.clone(),
            cause,
        })
    }
}
