mod support;

use std::sync::Arc;

use retrolink_core::guard::{GuardDecision, RouteGuard, Session, ADMIN_REQUIRED, LOGIN_REQUIRED};
use retrolink_core::RouteId;
use support::StaticPrivileges;

fn guard(privileges: StaticPrivileges) -> (RouteGuard, Arc<StaticPrivileges>) {
    let privileges = Arc::new(privileges);
    let guard = RouteGuard::new(
        [RouteId::new("admin")],
        RouteId::new("auth"),
        RouteId::new("home"),
        privileges.clone(),
    );
    (guard, privileges)
}

fn admins(subjects: &[&str]) -> StaticPrivileges {
    StaticPrivileges {
        admins: subjects.iter().map(|s| s.to_string()).collect(),
        ..StaticPrivileges::default()
    }
}

#[tokio::test]
async fn test_public_route_is_always_allowed() {
    let (guard, privileges) = guard(StaticPrivileges::default());

    assert!(guard.can_enter(&RouteId::new("games"), None).await.is_allowed());
    assert!(guard
        .can_enter(&RouteId::new("chat"), Some(&Session::new("u1")))
        .await
        .is_allowed());
    assert_eq!(*privileges.lookups.lock().unwrap(), 0, "public routes never consult the lookup");
}

#[tokio::test]
async fn test_privileged_route_requires_session() {
    let (guard, privileges) = guard(admins(&["root"]));

    let decision = guard.can_enter(&RouteId::new("admin"), None).await;

    assert_eq!(
        decision,
        GuardDecision::Deny {
            redirect: RouteId::new("auth"),
            message: LOGIN_REQUIRED.to_string(),
        }
    );
    assert_eq!(*privileges.lookups.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_privileged_route_requires_admin_record() {
    let (guard, _) = guard(admins(&["root"]));

    let denied = guard
        .can_enter(&RouteId::new("admin"), Some(&Session::new("player-one")))
        .await;
    assert_eq!(
        denied,
        GuardDecision::Deny {
            redirect: RouteId::new("home"),
            message: ADMIN_REQUIRED.to_string(),
        }
    );

    let allowed = guard
        .can_enter(&RouteId::new("admin"), Some(&Session::new("root")))
        .await;
    assert!(allowed.is_allowed());
}

#[tokio::test]
async fn test_lookup_error_denies() {
    let (guard, privileges) = guard(StaticPrivileges {
        fail: true,
        ..admins(&["root"])
    });

    let decision = guard
        .can_enter(&RouteId::new("admin"), Some(&Session::new("root")))
        .await;

    assert!(matches!(decision, GuardDecision::Deny { ref message, .. } if message == ADMIN_REQUIRED));
    assert_eq!(*privileges.lookups.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_decision_is_not_cached() {
    let (guard, privileges) = guard(admins(&["root"]));
    let session = Session::new("root");

    for _ in 0..3 {
        assert!(guard.can_enter(&RouteId::new("admin"), Some(&session)).await.is_allowed());
    }
    assert_eq!(*privileges.lookups.lock().unwrap(), 3);

    // Logged out between navigations
    assert!(!guard.can_enter(&RouteId::new("admin"), None).await.is_allowed());
}
