//! Delegated action handling.
//!
//! Injected markup declares what an element does with a `data-action`
//! attribute (and `data-route` where a route is involved). A single listener
//! at the container root turns an activated element into an [`Action`] through
//! the command map below.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::route::RouteId;

pub const ACTION_ATTR: &str = "data-action";
pub const ROUTE_ATTR: &str = "data-route";

/// The activated element, reduced to its attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionTarget {
    attributes: HashMap<String, String>,
}

impl ActionTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

pub type CommandHandler = Arc<dyn Fn(&ActionTarget) + Send + Sync>;

#[derive(Clone)]
pub enum Command {
    /// Set the fragment to the element's route, or `default`.
    Navigate { default: Option<RouteId> },
    /// Run the route's navigation again without touching the fragment.
    Reload { default: Option<RouteId> },
    Custom(CommandHandler),
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Navigate { default } => {
                f.debug_struct("Navigate").field("default", default).finish()
            }
            Command::Reload { default } => {
                f.debug_struct("Reload").field("default", default).finish()
            }
            Command::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// What the router should do for an activated element.
#[derive(Clone)]
pub enum Action {
    Navigate(RouteId),
    Reload(RouteId),
    Custom(CommandHandler, ActionTarget),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Navigate(route) => f.debug_tuple("Navigate").field(route).finish(),
            Action::Reload(route) => f.debug_tuple("Reload").field(route).finish(),
            Action::Custom(_, target) => f.debug_tuple("Custom").field(target).finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ActionDispatcher {
    commands: HashMap<String, Command>,
}

impl ActionDispatcher {
    /// `navigate`, `reload` and `go-home`.
    pub fn new(home: RouteId) -> Self {
        let mut commands = HashMap::new();
        commands.insert("navigate".to_string(), Command::Navigate { default: None });
        commands.insert("reload".to_string(), Command::Reload { default: None });
        commands.insert("go-home".to_string(), Command::Navigate { default: Some(home) });
        Self { commands }
    }

    pub fn register(&mut self, action: &str, command: Command) {
        self.commands.insert(action.to_string(), command);
    }

    pub fn resolve(&self, target: &ActionTarget) -> Option<Action> {
        let name = target.attr(ACTION_ATTR)?;
        let Some(command) = self.commands.get(name) else {
            tracing::warn!("unknown action `{}`", name);
            return None;
        };

        let route_for = |default: &Option<RouteId>| {
            target
                .attr(ROUTE_ATTR)
                .filter(|r| !r.is_empty())
                .map(RouteId::from)
                .or_else(|| default.clone())
        };

        match command {
            Command::Navigate { default } => route_for(default).map(Action::Navigate),
            Command::Reload { default } => route_for(default).map(Action::Reload),
            Command::Custom(handler) => Some(Action::Custom(handler.clone(), target.clone())),
        }
    }
}
