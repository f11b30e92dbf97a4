#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use retrolink_core::container::{MemoryContainer, MemoryDocument, SubmitHandler};
use retrolink_core::fallback::FallbackTable;
use retrolink_core::guard::{AdminRecord, LookupError, PrivilegeLookup, Session, SessionProvider};
use retrolink_core::host::{MemoryLocation, RecordingNotifier};
use retrolink_core::lifecycle::ModuleHandle;
use retrolink_core::markup::{MarkupError, MarkupSource};
use retrolink_core::registry::{ModuleRegistry, CORE_ROUTES};
use retrolink_core::shims::CompatShims;
use retrolink_core::{LoaderConfig, LoaderParts, RouteId, ViewLoader};

/// Markup served from memory; every request is recorded.
#[derive(Default)]
pub struct StubMarkup {
    pages: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl StubMarkup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, route: &str, markup: &str) -> Self {
        self.pages.insert(route.to_string(), markup.to_string());
        self
    }

    pub fn with_delay(mut self, route: &str, delay: Duration) -> Self {
        self.delays.insert(route.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarkupSource for StubMarkup {
    async fn fetch(&self, route: &RouteId) -> Result<String, MarkupError> {
        self.calls.lock().unwrap().push(route.to_string());
        if let Some(delay) = self.delays.get(route.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        self.pages
            .get(route.as_str())
            .cloned()
            .ok_or_else(|| MarkupError::Status {
                route: route.clone(),
                status: 404,
            })
    }
}

pub struct StaticSession(pub Option<Session>);

#[async_trait]
impl SessionProvider for StaticSession {
    async fn current_session(&self) -> Option<Session> {
        self.0.clone()
    }
}

#[derive(Default)]
pub struct StaticPrivileges {
    pub admins: HashSet<String>,
    pub fail: bool,
    pub delay: Option<Duration>,
    pub lookups: Mutex<usize>,
}

#[async_trait]
impl PrivilegeLookup for StaticPrivileges {
    async fn admin_record(&self, subject: &str) -> Result<Option<AdminRecord>, LookupError> {
        *self.lookups.lock().unwrap() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(LookupError::Backend("connection reset".to_string()));
        }
        Ok(self.admins.contains(subject).then(|| AdminRecord {
            subject: subject.to_string(),
            is_admin: true,
        }))
    }
}

pub struct Harness {
    pub loader: Arc<ViewLoader>,
    pub container: Option<Arc<MemoryContainer>>,
    pub markup: Arc<StubMarkup>,
    pub location: Arc<MemoryLocation>,
    pub notifier: Arc<RecordingNotifier>,
    pub privileges: Arc<StaticPrivileges>,
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::new()
    }

    pub fn container(&self) -> &Arc<MemoryContainer> {
        self.container.as_ref().expect("harness has a container")
    }

    pub fn html(&self) -> String {
        use retrolink_core::container::ViewContainer;
        self.container().markup()
    }
}

pub struct HarnessBuilder {
    pub config: LoaderConfig,
    markup: StubMarkup,
    registry: ModuleRegistry,
    fallback: FallbackTable,
    session: Option<Session>,
    privileges: StaticPrivileges,
    with_container: bool,
    location: Option<MemoryLocation>,
    games_submit: Option<SubmitHandler>,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        let config = LoaderConfig {
            legacy_shims: false,
            ..LoaderConfig::default()
        };
        let mut registry = ModuleRegistry::new();
        for route in CORE_ROUTES {
            registry.register_fn(route, || async { Ok(ModuleHandle::markup_only()) });
        }

        Self {
            fallback: FallbackTable::with_defaults(config.default_route()),
            config,
            markup: StubMarkup::new(),
            registry,
            session: None,
            privileges: StaticPrivileges::default(),
            with_container: true,
            location: None,
            games_submit: None,
        }
    }

    pub fn config(mut self, f: impl FnOnce(&mut LoaderConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn markup(mut self, markup: StubMarkup) -> Self {
        self.markup = markup;
        self
    }

    pub fn fallback(mut self, fallback: FallbackTable) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn module<F, Fut>(mut self, route: &str, load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<ModuleHandle>> + Send + 'static,
    {
        self.registry.register_fn(route, load);
        self
    }

    pub fn session(mut self, subject: &str) -> Self {
        self.session = Some(Session::new(subject));
        self
    }

    pub fn admin(mut self, subject: &str) -> Self {
        self.privileges.admins.insert(subject.to_string());
        self
    }

    pub fn failing_lookup(mut self) -> Self {
        self.privileges.fail = true;
        self
    }

    pub fn slow_lookup(mut self, delay: Duration) -> Self {
        self.privileges.delay = Some(delay);
        self
    }

    pub fn without_container(mut self) -> Self {
        self.with_container = false;
        self
    }

    pub fn location(mut self, location: MemoryLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn games_submit(mut self, handler: SubmitHandler) -> Self {
        self.games_submit = Some(handler);
        self
    }

    pub fn build(self) -> Harness {
        let document = if self.with_container {
            MemoryDocument::new()
        } else {
            MemoryDocument::without_container()
        };
        let container = document.container();
        let markup = Arc::new(self.markup);
        let location = Arc::new(self.location.unwrap_or_else(|| MemoryLocation::new("")));
        let notifier = Arc::new(RecordingNotifier::new());
        let privileges = Arc::new(self.privileges);

        let mut loader = ViewLoader::new(
            &self.config,
            LoaderParts {
                document: Arc::new(document),
                markup: markup.clone(),
                registry: self.registry,
                fallback: self.fallback,
                sessions: Arc::new(StaticSession(self.session)),
                privileges: privileges.clone(),
                location: location.clone(),
                notifier: notifier.clone(),
            },
        );
        if let Some(handler) = self.games_submit {
            let shims = CompatShims::from_config(&self.config).with_games_submit(handler);
            loader = loader.with_shims(shims);
        }

        Harness {
            loader: Arc::new(loader),
            container,
            markup,
            location,
            notifier,
            privileges,
        }
    }
}
