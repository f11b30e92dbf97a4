//! Post-navigation wiring kept for the auth and games views.
//!
//! Auth: if no form shows up within the retry delay, the view is replaced by a
//! retry prompt. Games: if the game form is present but its module did not
//! run an entry point, a plain submit handler is attached so submissions are not lost.
//! Both steps are skipped once a newer navigation has started.

use std::sync::Arc;
use std::time::Duration;

use crate::config::LoaderConfig;
use crate::container::{FormSubmission, SubmitHandler, ViewContainer};
use crate::route::RouteId;
use crate::sequence::{NavigationSequence, NavigationToken};

pub fn retry_prompt(route: &RouteId) -> String {
    format!(
        r#"<div class="module-retry">
  <p>This view is taking longer than expected.</p>
  <button data-action="reload" data-route="{}">Retry</button>
</div>"#,
        route
    )
}

#[derive(Clone)]
pub struct CompatShims {
    enabled: bool,
    auth_route: RouteId,
    games_route: RouteId,
    auth_delay: Duration,
    auth_form_selector: String,
    games_form_selector: String,
    games_submit: SubmitHandler,
}

impl CompatShims {
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self {
            enabled: config.legacy_shims,
            auth_route: config.login_route(),
            games_route: RouteId::new("games"),
            auth_delay: config.auth_retry_delay(),
            auth_form_selector: config.auth_form_selector.clone(),
            games_form_selector: config.games_form_selector.clone(),
            games_submit: Arc::new(|submission: &FormSubmission| {
                tracing::info!(
                    form = %submission.selector,
                    fields = submission.fields.len(),
                    "game submission captured by fallback handler"
                );
            }),
        }
    }

    pub fn with_games_submit(mut self, handler: SubmitHandler) -> Self {
        self.games_submit = handler;
        self
    }

    pub(crate) fn apply(
        &self,
        route: &RouteId,
        container: &Arc<dyn ViewContainer>,
        token: NavigationToken,
        sequence: &NavigationSequence,
        entry_ran: bool,
    ) {
        if !self.enabled {
            return;
        }

        if *route == self.auth_route {
            let container = container.clone();
            let sequence = sequence.clone();
            let route = route.clone();
            let delay = self.auth_delay;
            let selector = self.auth_form_selector.clone();

            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if !sequence.is_latest(token) {
                    return;
                }
                if !container.has_element(&selector) {
                    tracing::warn!(route = %route, "no `{}` after {:?}, showing retry prompt", selector, delay);
                    container.set_markup(&retry_prompt(&route));
                }
            });
        } else if *route == self.games_route
            && !entry_ran
            && container.has_element(&self.games_form_selector)
        {
            tracing::info!(route = %route, "attaching fallback submit handler to `{}`", self.games_form_selector);
            container.on_submit(&self.games_form_selector, self.games_submit.clone());
        }
    }
}
