//! Session gate behaviour through the public library API.

#![allow(clippy::unwrap_used)]

use chrono::Utc;
use secrecy::SecretString;

use stockroom_admin::models::Identity;
use stockroom_admin::services::navigation::{Access, HOME_PATH};
use stockroom_admin::services::{
    AuthError, DemoCredentials, Destination, DestinationRegistry, Resolution, SessionHandle,
    SystemClock, is_authorized,
};
use stockroom_admin::store::seed;
use stockroom_core::Role;

use stockroom_integration_tests::DEMO_PASSWORD;

fn credentials() -> DemoCredentials {
    DemoCredentials::new(seed::users(Utc::now()), SecretString::from(DEMO_PASSWORD))
}

fn account(role: Role) -> Identity {
    seed::users(Utc::now())
        .into_iter()
        .find(|u| u.role == role)
        .unwrap()
}

#[test]
fn test_is_authorized_matches_role_sets() {
    let registry = DestinationRegistry::standard();
    for rule in registry.rules() {
        let Access::Roles(required) = rule.access else {
            continue;
        };
        for role in Role::ALL {
            let identity = account(role);
            let expected = required.is_empty() || required.contains(&role);
            assert_eq!(
                is_authorized(Some(&identity), required),
                expected,
                "{role} at {}",
                rule.path
            );
        }
    }
}

#[test]
fn test_absent_identity_is_never_authorized() {
    assert!(!is_authorized(None, &[]));
    assert!(!is_authorized(None, &Role::ALL));
    assert!(!is_authorized(None, &[Role::Cashier]));
}

#[tokio::test]
async fn test_demo_pairs_sign_in_and_others_fail() {
    let store = credentials();
    for email in [
        "admin@inventory.com",
        "assistant@inventory.com",
        "cashier@inventory.com",
    ] {
        let session = SessionHandle::new();
        let identity = session
            .authenticate(&store, &SystemClock, email, DEMO_PASSWORD)
            .await
            .unwrap();
        assert_eq!(identity.email.as_str(), email);
        assert_eq!(session.current(), Some(identity));
    }

    let session = SessionHandle::new();
    for (email, password) in [
        ("admin@inventory.com", "password124"),
        ("owner@inventory.com", DEMO_PASSWORD),
        ("", ""),
    ] {
        let err = session
            .authenticate(&store, &SystemClock, email, password)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert!(session.current().is_none());
    }
}

#[tokio::test]
async fn test_clear_session_revokes_access() {
    let session = SessionHandle::new();
    session
        .authenticate(&credentials(), &SystemClock, "admin@inventory.com", DEMO_PASSWORD)
        .await
        .unwrap();
    assert!(is_authorized(session.current().as_ref(), &[Role::Admin]));

    session.clear_session();
    assert!(!is_authorized(session.current().as_ref(), &[Role::Admin]));
    session.clear_session();
    assert!(session.current().is_none());
    assert_eq!(session.require_identity(), Err(AuthError::NotAuthenticated));
}

#[tokio::test]
async fn test_return_path_survives_sign_in() {
    let registry = DestinationRegistry::standard();
    let session = SessionHandle::new();

    assert_eq!(
        session.navigate(&registry, "/products"),
        Resolution::Login {
            return_to: Some("/products".to_string())
        }
    );

    session
        .authenticate(&credentials(), &SystemClock, "admin@inventory.com", DEMO_PASSWORD)
        .await
        .unwrap();
    let back = session.take_return_path();
    assert_eq!(back, "/products");
    assert_eq!(
        session.navigate(&registry, &back),
        Resolution::Render(Destination::Products)
    );

    // Taken once; the next sign-in lands on the dashboard.
    assert_eq!(session.take_return_path(), HOME_PATH);
}

#[tokio::test]
async fn test_roles_see_their_destinations() {
    let registry = DestinationRegistry::standard();
    let cashier = account(Role::Cashier);
    let assistant = account(Role::Assistant);

    assert_eq!(
        registry.resolve("/users", Some(&cashier)),
        Resolution::Forbidden {
            destination: Destination::Users
        }
    );
    assert_eq!(
        registry.resolve("/sales", Some(&cashier)),
        Resolution::Render(Destination::Sales)
    );
    assert_eq!(
        registry.resolve("/products/3/delete", Some(&assistant)),
        Resolution::Render(Destination::Products)
    );
    assert_eq!(
        registry.resolve("/settings", Some(&assistant)),
        Resolution::Forbidden {
            destination: Destination::Settings
        }
    );
    assert_eq!(registry.resolve("/warehouse", Some(&assistant)), Resolution::NotFound);
}
