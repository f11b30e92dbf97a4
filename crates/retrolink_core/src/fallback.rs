//! Static markup used when a view's markup resource cannot be fetched.

use std::collections::HashMap;

use crate::route::RouteId;

const HOME: &str = r#"<section class="view view-home">
  <h1>Retrolink</h1>
  <p>Find players for the games you grew up with.</p>
  <nav>
    <button data-action="navigate" data-route="games">Browse games</button>
    <button data-action="navigate" data-route="chat">Open chat</button>
  </nav>
</section>"#;

const GAMES: &str = r#"<section class="view view-games">
  <h1>Games</h1>
  <div id="games-list"></div>
  <form id="game-form">
    <input name="title" placeholder="Title" required>
    <input name="platform" placeholder="Platform">
    <button type="submit">Submit game</button>
  </form>
</section>"#;

const AUTH: &str = r#"<section class="view view-auth">
  <h1>Sign in</h1>
  <form id="login-form">
    <input name="email" type="email" placeholder="Email" required>
    <input name="password" type="password" placeholder="Password" required>
    <button type="submit">Login</button>
  </form>
</section>"#;

const ADMIN: &str = r#"<section class="view view-admin">
  <h1>Pending submissions</h1>
  <div id="pending-games"></div>
</section>"#;

const CHAT: &str = r#"<section class="view view-chat">
  <h1>Chat</h1>
  <div id="chat-messages"></div>
  <form id="chat-form">
    <input name="message" placeholder="Say something">
  </form>
</section>"#;

const PROFILE: &str = r#"<section class="view view-profile">
  <h1>Profile</h1>
  <div id="profile-details"></div>
</section>"#;

/// Fallback markup keyed by route. Unlisted routes fall back to the home entry.
#[derive(Clone, Debug)]
pub struct FallbackTable {
    entries: HashMap<RouteId, String>,
    home: RouteId,
}

impl FallbackTable {
    /// Empty table whose catch-all entry is `home`.
    pub fn new(home: RouteId) -> Self {
        Self {
            entries: HashMap::new(),
            home,
        }
    }

    /// Built-in markup for the site's core views.
    pub fn with_defaults(home: RouteId) -> Self {
        let mut table = Self::new(home.clone());
        table.insert(home, HOME);
        table.insert(RouteId::new("games"), GAMES);
        table.insert(RouteId::new("auth"), AUTH);
        table.insert(RouteId::new("admin"), ADMIN);
        table.insert(RouteId::new("chat"), CHAT);
        table.insert(RouteId::new("profile"), PROFILE);
        table
    }

    pub fn insert(&mut self, route: RouteId, markup: impl Into<String>) {
        self.entries.insert(route, markup.into());
    }

    /// Entry for `route`, else the home entry.
    pub fn lookup(&self, route: &RouteId) -> Option<&str> {
        self.entries
            .get(route)
            .or_else(|| self.entries.get(&self.home))
            .map(String::as_str)
    }
}
