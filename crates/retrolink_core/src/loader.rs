//! Navigation orchestrator.
//!
//! Every navigation runs: guard, clear, markup (fetched or fallback), module
//! load, lifecycle, compatibility shims. Only the most recently requested
//! navigation may write to the view container; older ones stop at their next
//! write.

use std::sync::{Arc, Mutex, PoisonError};

use crate::config::LoaderConfig;
use crate::container::{Document, ViewContainer};
use crate::error::LoadError;
use crate::fallback::FallbackTable;
use crate::guard::{GuardDecision, PrivilegeLookup, RouteGuard, SessionProvider};
use crate::host::{Location, Notifier};
use crate::lifecycle::{self, EntryKind, ViewContext};
use crate::markup::MarkupSource;
use crate::registry::ModuleRegistry;
use crate::route::RouteId;
use crate::sequence::{NavigationSequence, NavigationToken};
use crate::shims::CompatShims;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkupOrigin {
    Fetched,
    Fallback,
    ErrorPanel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationReport {
    pub route: RouteId,
    pub markup: MarkupOrigin,
    /// Entry point that ran, if any.
    pub entry: Option<EntryKind>,
    /// Logged module failure, if any.
    pub module_error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    Completed(NavigationReport),
    Denied { route: RouteId, redirect: RouteId },
    ContainerMissing { route: RouteId },
    /// A newer navigation started before this one finished writing.
    Superseded { route: RouteId },
}

impl NavigationOutcome {
    pub fn route(&self) -> &RouteId {
        match self {
            NavigationOutcome::Completed(report) => &report.route,
            NavigationOutcome::Denied { route, .. }
            | NavigationOutcome::ContainerMissing { route }
            | NavigationOutcome::Superseded { route } => route,
        }
    }
}

/// Collaborators the loader talks to.
pub struct LoaderParts {
    pub document: Arc<dyn Document>,
    pub markup: Arc<dyn MarkupSource>,
    pub registry: ModuleRegistry,
    pub fallback: FallbackTable,
    pub sessions: Arc<dyn SessionProvider>,
    pub privileges: Arc<dyn PrivilegeLookup>,
    pub location: Arc<dyn Location>,
    pub notifier: Arc<dyn Notifier>,
}

pub struct ViewLoader {
    default_route: RouteId,
    document: Arc<dyn Document>,
    markup: Arc<dyn MarkupSource>,
    registry: ModuleRegistry,
    fallback: FallbackTable,
    guard: RouteGuard,
    sessions: Arc<dyn SessionProvider>,
    location: Arc<dyn Location>,
    notifier: Arc<dyn Notifier>,
    shims: CompatShims,
    sequence: NavigationSequence,
    current: Mutex<Option<RouteId>>,
}

impl ViewLoader {
    pub fn new(config: &LoaderConfig, parts: LoaderParts) -> Self {
        let guard = RouteGuard::new(
            config.privileged_routes(),
            config.login_route(),
            config.default_route(),
            parts.privileges,
        );

        Self {
            default_route: config.default_route(),
            document: parts.document,
            markup: parts.markup,
            registry: parts.registry,
            fallback: parts.fallback,
            guard,
            sessions: parts.sessions,
            location: parts.location,
            notifier: parts.notifier,
            shims: CompatShims::from_config(config),
            sequence: NavigationSequence::new(),
            current: Mutex::new(None),
        }
    }

    pub fn with_shims(mut self, shims: CompatShims) -> Self {
        self.shims = shims;
        self
    }

    /// Route of the latest requested navigation.
    pub fn current_route(&self) -> Option<RouteId> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Empty and unregistered routes become the default route.
    pub fn normalize(&self, requested: Option<&str>) -> RouteId {
        let route = match requested.map(str::trim) {
            Some(name) if !name.is_empty() => RouteId::new(name),
            _ => return self.default_route.clone(),
        };

        if self.registry.contains(&route) {
            route
        } else {
            tracing::debug!(route = %route, "unknown route, using {}", self.default_route);
            self.default_route.clone()
        }
    }

    /// Navigate to the route named by a `location.hash` value.
    pub async fn navigate_hash(&self, hash: &str) -> NavigationOutcome {
        let route = RouteId::from_hash(hash, &self.default_route);
        self.navigate(Some(route.as_str())).await
    }

    pub async fn navigate(&self, requested: Option<&str>) -> NavigationOutcome {
        // 1. Route
        let route = self.normalize(requested);
        let token = self.sequence.next();
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(route.clone());
        tracing::info!(route = %route, token = token.value(), "navigating");

        // 2. Guard
        if self.guard.is_privileged(&route) {
            let session = self.sessions.current_session().await;
            let decision = self.guard.can_enter(&route, session.as_ref()).await;

            if let GuardDecision::Deny { redirect, message } = decision {
                if !self.sequence.is_latest(token) {
                    return NavigationOutcome::Superseded { route };
                }
                tracing::info!(route = %route, redirect = %redirect, "navigation denied: {}", message);
                self.notifier.alert(&message);
                self.location.set_hash(&redirect.to_hash());
                return NavigationOutcome::Denied { route, redirect };
            }
        }

        // 3. Clear
        let Some(container) = self.document.view_container() else {
            tracing::error!(route = %route, "view container missing, nothing rendered");
            return NavigationOutcome::ContainerMissing { route };
        };
        if !self.sequence.is_latest(token) {
            return NavigationOutcome::Superseded { route };
        }
        container.clear();

        // 4. Markup
        let fetched = self.markup.fetch(&route).await;
        if !self.sequence.is_latest(token) {
            return NavigationOutcome::Superseded { route };
        }
        let origin = match fetched {
            Ok(markup) => {
                container.set_markup(&markup);
                MarkupOrigin::Fetched
            }
            Err(e) => {
                tracing::warn!(route = %route, "markup fetch failed, using fallback: {}", e);
                match self.fallback.lookup(&route) {
                    Some(markup) => {
                        container.set_markup(markup);
                        MarkupOrigin::Fallback
                    }
                    None => {
                        container.set_markup(&error_panel(&e.to_string()));
                        MarkupOrigin::ErrorPanel
                    }
                }
            }
        };

        // 5. Module
        let started = self.start_module(&route, &container, token).await;
        if !self.sequence.is_latest(token) {
            return NavigationOutcome::Superseded { route };
        }
        let (entry, module_error) = match started {
            Ok(entry) => (entry, None),
            Err(e) => {
                if e.is_init() {
                    tracing::warn!(route = %route, "{}", e);
                } else {
                    tracing::error!(route = %route, "{}", e);
                }
                (None, Some(e.to_string()))
            }
        };

        // 6. Compatibility wiring
        self.shims
            .apply(&route, &container, token, &self.sequence, entry.is_some());

        tracing::info!(route = %route, markup = ?origin, entry = ?entry, "navigation complete");
        NavigationOutcome::Completed(NavigationReport {
            route,
            markup: origin,
            entry,
            module_error,
        })
    }

    async fn start_module(
        &self,
        route: &RouteId,
        container: &Arc<dyn ViewContainer>,
        token: NavigationToken,
    ) -> Result<Option<EntryKind>, LoadError> {
        let handle = self.registry.resolve(route).await?;
        if !self.sequence.is_latest(token) {
            return Ok(None);
        }

        let ctx = ViewContext {
            route: route.clone(),
            container: container.clone(),
        };
        lifecycle::invoke(&handle, ctx).await
    }
}

/// Generic failure panel with a way back home.
pub fn error_panel(description: &str) -> String {
    format!(
        r#"<div class="module-error">
  <p>Error loading module: {}</p>
  <button data-action="go-home">Go Home</button>
</div>"#,
        escape_html(description)
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
