//! Binds the location fragment, delegated actions and live reloads to a [`ViewLoader`].

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::dispatch::{Action, ActionDispatcher, ActionTarget};
use crate::host::Location;
use crate::loader::{NavigationOutcome, ViewLoader};
use crate::watcher::RouteReload;

pub struct HashRouter {
    loader: Arc<ViewLoader>,
    location: Arc<dyn Location>,
    actions: ActionDispatcher,
}

impl HashRouter {
    pub fn new(
        loader: Arc<ViewLoader>,
        location: Arc<dyn Location>,
        actions: ActionDispatcher,
    ) -> Self {
        Self {
            loader,
            location,
            actions,
        }
    }

    /// Initial navigation for the current fragment.
    pub async fn start(&self) -> NavigationOutcome {
        self.loader.navigate_hash(&self.location.hash()).await
    }

    /// Navigate once per hash change, without waiting for earlier navigations.
    ///
    /// Also re-runs the current route when a reload names it. Returns when the
    /// hash-change channel closes.
    pub async fn run(
        &self,
        mut hash_changes: mpsc::UnboundedReceiver<String>,
        mut reloads: broadcast::Receiver<RouteReload>,
    ) {
        let mut in_flight: Vec<JoinHandle<NavigationOutcome>> = Vec::new();
        let mut reloads_open = true;

        loop {
            tokio::select! {
                hash = hash_changes.recv() => {
                    let Some(hash) = hash else { break };
                    in_flight.retain(|task| !task.is_finished());
                    in_flight.push(self.spawn_navigation(hash));
                }
                reload = reloads.recv(), if reloads_open => match reload {
                    Ok(RouteReload { route }) => {
                        if self.loader.current_route().as_ref() == Some(&route) {
                            tracing::info!(route = %route, "reloading current view");
                            in_flight.retain(|task| !task.is_finished());
                            in_flight.push(self.spawn_navigation(route.to_hash()));
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("dropped {} reload events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => reloads_open = false,
                },
            }
        }

        for task in in_flight {
            if let Err(e) = task.await {
                tracing::error!("navigation task failed: {}", e);
            }
        }
    }

    fn spawn_navigation(&self, hash: String) -> JoinHandle<NavigationOutcome> {
        let loader = self.loader.clone();
        tokio::spawn(async move { loader.navigate_hash(&hash).await })
    }

    /// Handle a click that reached the container root's delegated listener.
    pub async fn activate(&self, target: &ActionTarget) -> Option<NavigationOutcome> {
        match self.actions.resolve(target)? {
            Action::Navigate(route) => {
                let hash = route.to_hash();
                // Same fragment fires no hash change, so navigate here
                if self.location.hash() == hash {
                    return Some(self.loader.navigate(Some(route.as_str())).await);
                }
                self.location.set_hash(&hash);
                None
            }
            Action::Reload(route) => Some(self.loader.navigate(Some(route.as_str())).await),
            Action::Custom(handler, target) => {
                handler(&target);
                None
            }
        }
    }
}
