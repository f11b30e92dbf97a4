use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Component, Path};
use tokio::sync::broadcast;

use crate::route::RouteId;

/// A view's files changed on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteReload {
    pub route: RouteId,
}

/// Route owning `path`, i.e. the first directory under `markup_root`.
pub fn route_for_path(markup_root: &Path, path: &Path) -> Option<RouteId> {
    let relative = path.strip_prefix(markup_root).ok()?;
    let mut components = relative.components();

    let first = match components.next()? {
        Component::Normal(name) => name.to_str()?,
        _ => return None,
    };
    // Files directly in the root belong to no view
    components.next()?;

    Some(RouteId::new(first))
}

/// Watch `markup_root` and broadcast a [`RouteReload`] per touched view.
pub async fn watch_modules(
    markup_root: &Path,
    tx: broadcast::Sender<RouteReload>,
) -> anyhow::Result<()> {
    let (notif_tx, mut notif_rx) = tokio::sync::mpsc::channel(100);

    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = notif_tx.blocking_send(res);
        },
        Config::default(),
    )?;

    // Paths from notify are absolute
    let root = markup_root.canonicalize()?;
    watcher.watch(&root, RecursiveMode::Recursive)?;

    tracing::info!("Watching views in {}", root.display());

    while let Some(res) = notif_rx.recv().await {
        match res {
            Ok(event) => {
                if event.kind.is_access() {
                    continue;
                }

                let routes: BTreeSet<RouteId> = event
                    .paths
                    .iter()
                    .filter_map(|p| route_for_path(&root, p))
                    .collect();

                for route in routes {
                    tracing::info!(route = %route, "view changed on disk");
                    // No subscribers is fine, nobody is routing yet
                    let _ = tx.send(RouteReload { route });
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}
