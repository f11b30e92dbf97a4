//! Browser-side collaborators: the location fragment and user alerts.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

pub trait Location: Send + Sync {
    fn hash(&self) -> String;
    /// Changing the fragment fires a hash-change event; setting the same value does not.
    fn set_hash(&self, hash: &str);
}

/// Blocking user-facing message (`window.alert`).
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// In-memory location that records every fragment it was given.
pub struct MemoryLocation {
    hash: Mutex<String>,
    history: Mutex<Vec<String>>,
    changes: Option<mpsc::UnboundedSender<String>>,
}

impl MemoryLocation {
    pub fn new(initial: &str) -> Self {
        Self {
            hash: Mutex::new(initial.to_string()),
            history: Mutex::new(Vec::new()),
            changes: None,
        }
    }

    /// Location that also emits hash-change events, like `window.onhashchange`.
    pub fn with_events(initial: &str) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let location = Self {
            changes: Some(tx),
            ..Self::new(initial)
        };
        (location, rx)
    }

    /// Fragments set after construction, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Location for MemoryLocation {
    fn hash(&self) -> String {
        self.hash
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_hash(&self, hash: &str) {
        {
            let mut current = self.hash.lock().unwrap_or_else(PoisonError::into_inner);
            if *current == hash {
                return;
            }
            *current = hash.to_string();
        }
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hash.to_string());

        if let Some(tx) = &self.changes {
            // Receiver gone means nobody is routing anymore
            let _ = tx.send(hash.to_string());
        }
    }
}

/// Collects alerts instead of showing them.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        tracing::info!("alert: {}", message);
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
