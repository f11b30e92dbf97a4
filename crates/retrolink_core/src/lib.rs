//! Hash-route view loader for the Retrolink community site.
//!
//! The URL fragment selects a view; the [`loader::ViewLoader`] guards it,
//! renders its markup (fetched or fallback) and starts its module.

pub mod config;
pub mod container;
pub mod dispatch;
pub mod error;
pub mod fallback;
pub mod guard;
pub mod host;
pub mod lifecycle;
pub mod loader;
pub mod markup;
pub mod registry;
pub mod route;
pub mod router;
pub mod sequence;
pub mod server;
pub mod shims;
pub mod watcher;

pub use config::LoaderConfig;
pub use error::LoadError;
pub use loader::{LoaderParts, NavigationOutcome, ViewLoader};
pub use route::RouteId;
pub use router::HashRouter;
pub use server::serve;
