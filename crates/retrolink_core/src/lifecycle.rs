//! View module contract and the lifecycle invoker.
//!
//! New views implement [`ViewModule`]. Views that still ship the old export
//! shapes are wrapped in [`ModuleExports`], whose entry points are tried in a
//! fixed order and only the first present one runs.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::container::ViewContainer;
use crate::error::LoadError;
use crate::route::RouteId;

/// Handed to a view once its markup is in the container.
#[derive(Clone)]
pub struct ViewContext {
    pub route: RouteId,
    pub container: Arc<dyn ViewContainer>,
}

impl fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewContext")
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait ViewModule: Send + Sync {
    async fn init_module(&self, ctx: ViewContext) -> anyhow::Result<()>;
}

pub type EntryPoint =
    Arc<dyn Fn(ViewContext) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Wrap an async closure as an [`EntryPoint`].
pub fn entry<F, Fut>(f: F) -> EntryPoint
where
    F: Fn(ViewContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// Which entry point a module was started through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    InitModule,
    DefaultInitModule,
    InitAuthModule,
    Init,
}

impl EntryKind {
    pub fn export_name(self) -> &'static str {
        match self {
            EntryKind::InitModule => "initModule",
            EntryKind::DefaultInitModule => "default.initModule",
            EntryKind::InitAuthModule => "initAuthModule",
            EntryKind::Init => "init",
        }
    }
}

/// Legacy export set of a view that has not moved to [`ViewModule`] yet.
#[derive(Clone, Default)]
pub struct ModuleExports {
    init_module: Option<EntryPoint>,
    default_init_module: Option<EntryPoint>,
    init_auth_module: Option<EntryPoint>,
    init: Option<EntryPoint>,
}

impl ModuleExports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_init_module(mut self, entry: EntryPoint) -> Self {
        self.init_module = Some(entry);
        self
    }

    pub fn with_default_init_module(mut self, entry: EntryPoint) -> Self {
        self.default_init_module = Some(entry);
        self
    }

    pub fn with_init_auth_module(mut self, entry: EntryPoint) -> Self {
        self.init_auth_module = Some(entry);
        self
    }

    pub fn with_init(mut self, entry: EntryPoint) -> Self {
        self.init = Some(entry);
        self
    }

    /// First present entry point in priority order.
    pub fn entry_point(&self) -> Option<(EntryKind, &EntryPoint)> {
        [
            (EntryKind::InitModule, &self.init_module),
            (EntryKind::DefaultInitModule, &self.default_init_module),
            (EntryKind::InitAuthModule, &self.init_auth_module),
            (EntryKind::Init, &self.init),
        ]
        .into_iter()
        .find_map(|(kind, slot)| slot.as_ref().map(|e| (kind, e)))
    }
}

impl fmt::Debug for ModuleExports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleExports")
            .field("entry", &self.entry_point().map(|(kind, _)| kind))
            .finish()
    }
}

/// A loaded view module.
#[derive(Clone)]
pub enum ModuleHandle {
    View(Arc<dyn ViewModule>),
    Exports(ModuleExports),
}

impl ModuleHandle {
    pub fn view(module: impl ViewModule + 'static) -> Self {
        ModuleHandle::View(Arc::new(module))
    }

    /// A view that is markup only.
    pub fn markup_only() -> Self {
        ModuleHandle::Exports(ModuleExports::default())
    }
}

impl fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleHandle::View(_) => f.write_str("ModuleHandle::View"),
            ModuleHandle::Exports(exports) => {
                f.debug_tuple("ModuleHandle::Exports").field(exports).finish()
            }
        }
    }
}

/// Run the module's entry point, if it has one.
///
/// Returns the entry point that ran; `None` means the module has no behaviour.
pub async fn invoke(
    handle: &ModuleHandle,
    ctx: ViewContext,
) -> Result<Option<EntryKind>, LoadError> {
    let route = ctx.route.clone();

    let (kind, result) = match handle {
        ModuleHandle::View(module) => (EntryKind::InitModule, module.init_module(ctx).await),
        ModuleHandle::Exports(exports) => match exports.entry_point() {
            Some((kind, entry)) => {
                if kind != EntryKind::InitModule {
                    tracing::debug!(route = %route, "starting module through legacy export `{}`", kind.export_name());
                }
                (kind, entry(ctx).await)
            }
            None => return Ok(None),
        },
    };

    result
        .map(|()| Some(kind))
        .map_err(|cause| LoadError::Init { route, cause })
}
