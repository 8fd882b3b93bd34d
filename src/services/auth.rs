//! Admin authentication: credential check and session lifecycle

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{CreateUser, SessionUser},
    repository::Storage,
    services::sessions::{Session, SessionStore},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,
    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Authentication(e.to_string())
    }
}

/// Decides whether a username/password pair identifies a user
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> Result<SessionUser, AuthError>;
}

/// Accepts exactly one configured credential pair
pub struct FixedCredentialVerifier {
    username: String,
    password: String,
    identity: SessionUser,
}

impl FixedCredentialVerifier {
    pub fn new(config: &AuthConfig, identity: SessionUser) -> Self {
        Self {
            username: config.admin_username.clone(),
            password: config.admin_password.clone(),
            identity,
        }
    }
}

#[async_trait]
impl CredentialVerifier for FixedCredentialVerifier {
    async fn verify(&self, username: &str, password: &str) -> Result<SessionUser, AuthError> {
        if username == self.username && password == self.password {
            Ok(self.identity.clone())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    storage: Arc<dyn Storage>,
    sessions: Arc<dyn SessionStore>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl AuthService {
    pub fn new(
        storage: Arc<dyn Storage>,
        sessions: Arc<dyn SessionStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            storage,
            sessions,
            verifier,
        }
    }

    /// Make sure the admin account exists in the store and return its identity
    pub async fn ensure_admin(storage: &dyn Storage, config: &AuthConfig) -> AppResult<SessionUser> {
        if let Some(user) = storage.get_user_by_username(&config.admin_username).await? {
            return Ok(SessionUser::from(&user));
        }
        let user = storage
            .create_user(CreateUser {
                username: config.admin_username.clone(),
                password: config.admin_password.clone(),
            })
            .await?;
        tracing::info!("Created admin account '{}' (id {})", user.username, user.id);
        Ok(SessionUser::from(&user))
    }

    /// Verify credentials and open a new session
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Session> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials.into());
        }
        let user = match self.verifier.verify(username, password).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Login failed for '{}'", username);
                return Err(e.into());
            }
        };
        let session = self.sessions.create(user.id).await?;
        tracing::info!("Login successful for '{}'", user.username);
        Ok(session)
    }

    /// Destroy the caller's session, if it has one
    pub async fn logout(&self, session_id: Option<&str>) -> AppResult<()> {
        if let Some(id) = session_id {
            if self.sessions.destroy(id).await? {
                tracing::info!("Session closed");
            }
        }
        Ok(())
    }

    /// Resolve a session token to the logged-in identity
    pub async fn authenticate(&self, session_id: &str) -> AppResult<SessionUser> {
        let unauthorized = || AppError::Authentication("Unauthorized".to_string());

        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or_else(unauthorized)?;
        let user = self
            .storage
            .get_user(session.user_id)
            .await?
            .ok_or_else(unauthorized)?;
        Ok(SessionUser::from(&user))
    }
}
