use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Issued when a navigation starts. Only the latest token may write to the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct NavigationToken(u64);

impl NavigationToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct NavigationSequence {
    latest: Arc<AtomicU64>,
}

impl NavigationSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> NavigationToken {
        NavigationToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, token: NavigationToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}
