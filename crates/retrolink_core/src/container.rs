//! View container abstraction and an in-memory document.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Form fields delivered to a submit handler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormSubmission {
    pub selector: String,
    pub fields: HashMap<String, String>,
}

pub type SubmitHandler = Arc<dyn Fn(&FormSubmission) + Send + Sync>;

/// The element views are rendered into.
pub trait ViewContainer: Send + Sync {
    fn clear(&self);
    /// Replace the container's content. Handlers attached to the old content are dropped.
    fn set_markup(&self, markup: &str);
    fn markup(&self) -> String;
    /// Supports `#id` and bare tag selectors.
    fn has_element(&self, selector: &str) -> bool;
    fn on_submit(&self, selector: &str, handler: SubmitHandler);
}

pub trait Document: Send + Sync {
    fn view_container(&self) -> Option<Arc<dyn ViewContainer>>;
}

#[derive(Default)]
struct ContainerState {
    markup: String,
    handlers: HashMap<String, Vec<SubmitHandler>>,
    writes: usize,
}

/// Headless container backed by a string.
#[derive(Default)]
pub struct MemoryContainer {
    state: Mutex<ContainerState>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ContainerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fire the submit handlers attached to `selector`; returns how many ran.
    pub fn submit(&self, selector: &str, fields: HashMap<String, String>) -> usize {
        let handlers = self
            .state()
            .handlers
            .get(selector)
            .cloned()
            .unwrap_or_default();

        let submission = FormSubmission {
            selector: selector.to_string(),
            fields,
        };
        for handler in &handlers {
            handler(&submission);
        }
        handlers.len()
    }

    pub fn handler_count(&self, selector: &str) -> usize {
        self.state().handlers.get(selector).map_or(0, Vec::len)
    }

    /// Number of content writes (clears and replacements) seen so far.
    pub fn writes(&self) -> usize {
        self.state().writes
    }
}

impl ViewContainer for MemoryContainer {
    fn clear(&self) {
        let mut state = self.state();
        state.markup.clear();
        state.handlers.clear();
        state.writes += 1;
    }

    fn set_markup(&self, markup: &str) {
        let mut state = self.state();
        state.markup = markup.to_string();
        state.handlers.clear();
        state.writes += 1;
    }

    fn markup(&self) -> String {
        self.state().markup.clone()
    }

    fn has_element(&self, selector: &str) -> bool {
        let state = self.state();
        match selector.strip_prefix('#') {
            Some(id) => {
                state.markup.contains(&format!("id=\"{}\"", id))
                    || state.markup.contains(&format!("id='{}'", id))
            }
            None => {
                let open = format!("<{}", selector);
                state.markup.match_indices(&open).any(|(at, _)| {
                    matches!(
                        state.markup[at + open.len()..].chars().next(),
                        Some('>' | ' ' | '\n' | '\t' | '/')
                    )
                })
            }
        }
    }

    fn on_submit(&self, selector: &str, handler: SubmitHandler) {
        self.state()
            .handlers
            .entry(selector.to_string())
            .or_default()
            .push(handler);
    }
}

/// Document holding at most one [`MemoryContainer`].
pub struct MemoryDocument {
    container: Option<Arc<MemoryContainer>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            container: Some(Arc::new(MemoryContainer::new())),
        }
    }

    /// A page whose shell never rendered the view container.
    pub fn without_container() -> Self {
        Self { container: None }
    }

    pub fn container(&self) -> Option<Arc<MemoryContainer>> {
        self.container.clone()
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn view_container(&self) -> Option<Arc<dyn ViewContainer>> {
        self.container
            .clone()
            .map(|c| c as Arc<dyn ViewContainer>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors() {
        let container = MemoryContainer::new();
        container.set_markup(r#"<form id="game-form"><input name="title"></form>"#);

        assert!(container.has_element("#game-form"));
        assert!(container.has_element("form"));
        assert!(container.has_element("input"));
        assert!(!container.has_element("#login-form"));
        // `<formula>` is not a form
        container.set_markup("<formula></formula>");
        assert!(!container.has_element("form"));
    }

    #[test]
    fn test_replacing_markup_drops_handlers() {
        let container = MemoryContainer::new();
        container.set_markup(r#"<form id="chat-form"></form>"#);
        container.on_submit("#chat-form", Arc::new(|_: &FormSubmission| {}));
        assert_eq!(container.handler_count("#chat-form"), 1);

        container.set_markup(r#"<form id="chat-form"></form>"#);
        assert_eq!(container.handler_count("#chat-form"), 0);
    }
}
