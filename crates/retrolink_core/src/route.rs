use std::borrow::Borrow;
use std::fmt;

/// Fragment prefix every route hash carries (`#/games`).
pub const HASH_PREFIX: &str = "#/";

/// Route identifier, e.g. `home`, `games`, `admin`.
///
/// Derived from the URL fragment on every navigation and never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(String);

impl RouteId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a `location.hash` value. Empty or missing fragments yield `default`.
    pub fn from_hash(hash: &str, default: &RouteId) -> RouteId {
        let name = hash
            .strip_prefix(HASH_PREFIX)
            .or_else(|| hash.strip_prefix('#'))
            .unwrap_or(hash)
            .trim();

        if name.is_empty() {
            default.clone()
        } else {
            RouteId::new(name)
        }
    }

    /// Fragment that selects this route.
    pub fn to_hash(&self) -> String {
        format!("{}{}", HASH_PREFIX, self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for RouteId {
    fn from(name: &str) -> Self {
        RouteId::new(name)
    }
}

impl From<String> for RouteId {
    fn from(name: String) -> Self {
        RouteId(name)
    }
}

impl Borrow<str> for RouteId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
