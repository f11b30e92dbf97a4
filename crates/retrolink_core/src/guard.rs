//! Route guard for privileged views.
//!
//! The guard only computes a [`GuardDecision`]; alerting the user and
//! redirecting are left to the caller so the decision can be tested without a
//! document.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::route::RouteId;

pub const LOGIN_REQUIRED: &str = "Please login first";
pub const ADMIN_REQUIRED: &str = "Admin access required";

/// Signed-in user as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub subject: String,
}

impl Session {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_session(&self) -> Option<Session>;
}

/// Row of the administrators table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminRecord {
    pub subject: String,
    pub is_admin: bool,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("privilege lookup failed: {0}")]
    Backend(String),
}

#[async_trait]
pub trait PrivilegeLookup: Send + Sync {
    async fn admin_record(&self, subject: &str) -> Result<Option<AdminRecord>, LookupError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Deny { redirect: RouteId, message: String },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

pub struct RouteGuard {
    privileged: HashSet<RouteId>,
    login_route: RouteId,
    home_route: RouteId,
    lookup: Arc<dyn PrivilegeLookup>,
}

impl RouteGuard {
    pub fn new<I>(
        privileged: I,
        login_route: RouteId,
        home_route: RouteId,
        lookup: Arc<dyn PrivilegeLookup>,
    ) -> Self
    where
        I: IntoIterator<Item = RouteId>,
    {
        Self {
            privileged: privileged.into_iter().collect(),
            login_route,
            home_route,
            lookup,
        }
    }

    pub fn is_privileged(&self, route: &RouteId) -> bool {
        self.privileged.contains(route)
    }

    pub async fn can_enter(&self, route: &RouteId, session: Option<&Session>) -> GuardDecision {
        if !self.is_privileged(route) {
            return GuardDecision::Allow;
        }

        let Some(session) = session else {
            tracing::debug!(route = %route, "no session for privileged route");
            return self.deny(&self.login_route, LOGIN_REQUIRED);
        };

        match self.lookup.admin_record(&session.subject).await {
            Ok(Some(record)) if record.is_admin => GuardDecision::Allow,
            Ok(_) => {
                tracing::debug!(route = %route, subject = %session.subject, "subject is not an administrator");
                self.deny(&self.home_route, ADMIN_REQUIRED)
            }
            Err(e) => {
                tracing::warn!(route = %route, subject = %session.subject, "admin lookup failed: {}", e);
                self.deny(&self.home_route, ADMIN_REQUIRED)
            }
        }
    }

    fn deny(&self, redirect: &RouteId, message: &str) -> GuardDecision {
        GuardDecision::Deny {
            redirect: redirect.clone(),
            message: message.to_string(),
        }
    }
}
