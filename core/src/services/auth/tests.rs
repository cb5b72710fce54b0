//! Authentication service tests against the in-memory repositories.

use std::sync::Arc;

use sf_shared::config::JwtConfig;

use crate::domain::entities::user::UserRole;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{MockTokenRepository, MockUserRepository, UserRepository};
use crate::services::token::{TokenService, TokenServiceConfig};

use super::config::AuthServiceConfig;
use super::service::AuthService;

const TEST_SECRET: &str = "unit-test-signing-secret-0123456789abcdef";

struct Fixture {
    svc: AuthService<MockUserRepository, MockTokenRepository>,
    users: Arc<MockUserRepository>,
}

fn fixture() -> Fixture {
    fixture_with(AuthServiceConfig {
        // Low cost keeps the tests fast; production uses bcrypt::DEFAULT_COST
        bcrypt_cost: 4,
        ..Default::default()
    })
}

fn fixture_with(config: AuthServiceConfig) -> Fixture {
    let users = Arc::new(MockUserRepository::new());
    let token_service = TokenService::new(
        MockTokenRepository::new(),
        TokenServiceConfig::new(JwtConfig::new(TEST_SECRET)),
    )
    .unwrap();

    Fixture {
        svc: AuthService::new(users.clone(), Arc::new(token_service), config),
        users,
    }
}

#[tokio::test]
async fn test_register_then_login() {
    let f = fixture();

    let registered = f
        .svc
        .register(
            "alice@example.com",
            "alice",
            "correct horse battery staple",
            UserRole::Customer,
            "10.0.0.1",
        )
        .await
        .unwrap();
    assert_eq!(registered.role, UserRole::Customer);
    assert!(!registered.access_token.is_empty());

    let logged_in = f
        .svc
        .login("alice@example.com", "correct horse battery staple", "10.0.0.1")
        .await
        .unwrap();
    assert_eq!(logged_in.role, UserRole::Customer);
    assert_ne!(logged_in.refresh_token, registered.refresh_token);
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let f = fixture();

    let result = f
        .svc
        .register("not-an-email", "alice", "pw", UserRole::Customer, "10.0.0.1")
        .await;
    assert!(matches!(result.err(), Some(DomainError::Validation { .. })));

    let result = f
        .svc
        .register("alice@example.com", "a", "pw", UserRole::Customer, "10.0.0.1")
        .await;
    assert!(matches!(result.err(), Some(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let f = fixture();
    f.svc
        .register("alice@example.com", "alice", "pw-one", UserRole::Customer, "10.0.0.1")
        .await
        .unwrap();

    let result = f
        .svc
        .register("alice@example.com", "alice2", "pw-two", UserRole::Customer, "10.0.0.1")
        .await;
    assert!(matches!(
        result.err(),
        Some(DomainError::Auth(AuthError::EmailAlreadyRegistered))
    ));
}

#[tokio::test]
async fn test_registration_can_be_disabled() {
    let f = fixture_with(AuthServiceConfig {
        allow_registration: false,
        bcrypt_cost: 4,
    });

    let result = f
        .svc
        .register("alice@example.com", "alice", "pw", UserRole::Customer, "10.0.0.1")
        .await;
    assert!(matches!(result.err(), Some(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let f = fixture();
    f.svc
        .register("alice@example.com", "alice", "right-password", UserRole::Customer, "10.0.0.1")
        .await
        .unwrap();

    let unknown = f
        .svc
        .login("nobody@example.com", "whatever", "10.0.0.1")
        .await
        .err();
    let wrong = f
        .svc
        .login("alice@example.com", "wrong-password", "10.0.0.1")
        .await
        .err();

    assert!(matches!(
        unknown,
        Some(DomainError::Auth(AuthError::InvalidCredentials))
    ));
    assert!(matches!(
        wrong,
        Some(DomainError::Auth(AuthError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_login_rejects_disabled_account() {
    let f = fixture();
    let response = f
        .svc
        .register("alice@example.com", "alice", "pw-secret", UserRole::Staff, "10.0.0.1")
        .await
        .unwrap();

    let user = f
        .users
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(f.users.set_active(user.id, false).await);

    let result = f.svc.login("alice@example.com", "pw-secret", "10.0.0.1").await;
    assert!(matches!(
        result.err(),
        Some(DomainError::Auth(AuthError::AccountDisabled))
    ));

    // Its refresh flow is dead too
    let result = f
        .svc
        .refresh(&response.access_token, &response.refresh_token, "10.0.0.1")
        .await;
    assert!(matches!(
        result.err(),
        Some(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn test_refresh_flow_end_to_end() {
    let f = fixture();
    let registered = f
        .svc
        .register("alice@example.com", "alice", "pw-secret", UserRole::Admin, "10.0.0.1")
        .await
        .unwrap();

    let refreshed = f
        .svc
        .refresh(&registered.access_token, &registered.refresh_token, "10.0.0.2")
        .await
        .unwrap();
    assert_eq!(refreshed.role, UserRole::Admin);
    assert_ne!(refreshed.refresh_token, registered.refresh_token);

    // The spent refresh token no longer works
    let result = f
        .svc
        .refresh(&registered.access_token, &registered.refresh_token, "10.0.0.2")
        .await;
    assert!(matches!(
        result.err(),
        Some(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn test_logout_kills_refresh() {
    let f = fixture();
    let response = f
        .svc
        .register("alice@example.com", "alice", "pw-secret", UserRole::Customer, "10.0.0.1")
        .await
        .unwrap();

    assert!(f.svc.logout(&response.refresh_token, "10.0.0.1").await.unwrap());

    let result = f
        .svc
        .refresh(&response.access_token, &response.refresh_token, "10.0.0.1")
        .await;
    assert!(matches!(
        result.err(),
        Some(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn test_logout_all_revokes_every_session() {
    let f = fixture();
    let first = f
        .svc
        .register("alice@example.com", "alice", "pw-secret", UserRole::Customer, "10.0.0.1")
        .await
        .unwrap();
    let second = f
        .svc
        .login("alice@example.com", "pw-secret", "10.0.0.2")
        .await
        .unwrap();

    let user = f
        .users
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    let revoked = f.svc.logout_all(user.id, "10.0.0.1").await.unwrap();
    assert_eq!(revoked, 2);

    for response in [first, second] {
        let result = f
            .svc
            .refresh(&response.access_token, &response.refresh_token, "10.0.0.1")
            .await;
        assert!(result.is_err());
    }
}
