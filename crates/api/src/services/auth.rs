//! Operator login and session lookup.

use std::sync::Arc;

use domain::models::User;
use domain::stores::UserStore;
use domain::{DomainError, StoreError};
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{verify_password, PasswordError};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("User is disabled")]
    UserDisabled,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::UserNotFound => {
                ApiError::Unauthorized("Session user no longer exists".to_string())
            }
            AuthError::UserDisabled => ApiError::Forbidden("Account is disabled".to_string()),
            AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
            AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
            AuthError::Store(e) => DomainError::from(e).into(),
        }
    }
}

/// A successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub jti: String,
    pub expires_in: i64,
}

/// Verifies operator credentials and issues session tokens.
#[derive(Clone)]
pub struct SessionAuthenticator {
    users: Arc<dyn UserStore>,
    jwt: Arc<JwtConfig>,
}

impl SessionAuthenticator {
    pub fn new(users: Arc<dyn UserStore>, jwt: Arc<JwtConfig>) -> Self {
        Self { users, jwt }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim().to_lowercase();

        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            warn!(user_id = %user.id, "Login attempt for disabled account");
            return Err(AuthError::UserDisabled);
        }

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let (token, jti) = self.jwt.issue_session_token(user.id, Some(&user.email))?;
        info!(user_id = %user.id, jti = %jti, "Operator logged in");

        Ok(Session {
            user,
            token,
            jti,
            expires_in: self.jwt.session_expiry_secs,
        })
    }

    /// Loads the operator behind a validated session.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AuthError> {
        let user = self
            .users
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::stores::Stores;
    use shared::password::hash_password;

    const PASSWORD: &str = "Sup3rSecret!";

    fn authenticator() -> (SessionAuthenticator, Arc<domain::stores::InMemoryStore>) {
        let (stores, backend) = Stores::in_memory();
        let jwt = Arc::new(JwtConfig::from_secret("auth-service-test", 3600));
        (SessionAuthenticator::new(stores.users, jwt), backend)
    }

    #[tokio::test]
    async fn test_login_issues_token_for_subject() {
        let (auth, backend) = authenticator();
        let hash = hash_password(PASSWORD).unwrap();
        let user = backend
            .seed_user("ops@example.com", Some("Ops"), &hash, true)
            .unwrap();

        let session = auth.login("  OPS@example.com ", PASSWORD).await.unwrap();

        assert_eq!(session.user.id, user.id);
        assert_eq!(session.expires_in, 3600);
        let claims = auth.jwt.validate_session_token(&session.token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.jti, session.jti);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (auth, backend) = authenticator();
        let hash = hash_password(PASSWORD).unwrap();
        backend.seed_user("ops@example.com", None, &hash, true).unwrap();

        let err = auth.login("ops@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let (auth, _) = authenticator();
        let err = auth.login("nobody@example.com", PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_disabled_account() {
        let (auth, backend) = authenticator();
        let hash = hash_password(PASSWORD).unwrap();
        backend.seed_user("gone@example.com", None, &hash, false).unwrap();

        let err = auth.login("gone@example.com", PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::UserDisabled));
        assert!(matches!(ApiError::from(err), ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_current_user_missing() {
        let (auth, _) = authenticator();
        let err = auth.current_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_store_outage_maps_to_service_unavailable() {
        let (auth, backend) = authenticator();
        backend.set_unavailable(true);

        let err = auth.login("ops@example.com", PASSWORD).await.unwrap_err();
        assert!(matches!(ApiError::from(err), ApiError::ServiceUnavailable(_)));
    }
}
