//! Credential store: owns the authentication session lifecycle.
//!
//! The store holds the single authoritative `Session`, persists it through
//! the key-value storage seam, and restores it at process start. The API
//! gateway reads the token from here and calls `clear_session` when the
//! backend rejects authentication.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::api::ApiError;
use crate::shell::Navigator;
use crate::storage::KeyValueStorage;

use super::Session;

/// Persisted storage key for the bearer token
pub const TOKEN_KEY: &str = "auth_token";

/// Persisted storage key for the display name
pub const USERNAME_KEY: &str = "username";

/// Persisted storage key for the numeric user id
pub const USER_ID_KEY: &str = "user_id";

/// Login form credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Identity returned by a successful authentication exchange.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub token: String,
    pub user_id: i64,
    pub username: String,
}

/// External collaborator performing the authentication exchange.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthenticatedUser, ApiError>;
}

/// Authentication session store.
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    session: Mutex<Session>,
}

impl CredentialStore {
    /// Create the store and restore any persisted session.
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        let store = Self {
            storage,
            navigator,
            login_path: login_path.into(),
            session: Mutex::new(Session::default()),
        };
        store.restore();
        store
    }

    /// Re-read the persisted session fields. Never fails: anything short of
    /// all three fields being present yields the logged-out session.
    pub fn restore(&self) {
        let token = self.storage.get(TOKEN_KEY);
        let username = self.storage.get(USERNAME_KEY);
        let user_id = self.storage.get(USER_ID_KEY);

        let restored = match (token, username, user_id) {
            (Some(token), Some(username), Some(user_id)) if !token.is_empty() => {
                Session::new(token, user_id.parse().unwrap_or(0), username)
            }
            _ => Session::default(),
        };

        debug!(authenticated = restored.is_authenticated(), "Restored session");
        *self.lock_session() = restored;
    }

    /// Authenticate through `authenticator` and install the resulting
    /// session. Persisted writes complete before this returns; on failure
    /// the current session is untouched and the error propagates unchanged.
    pub async fn login(
        &self,
        authenticator: &dyn Authenticator,
        credentials: &Credentials,
    ) -> Result<Session, ApiError> {
        let user = authenticator.authenticate(credentials).await?;
        let session = Session::new(user.token, user.user_id, user.username);

        self.storage.set(TOKEN_KEY, &session.token);
        self.storage.set(USERNAME_KEY, &session.username);
        self.storage.set(USER_ID_KEY, &session.user_id.to_string());
        *self.lock_session() = session.clone();

        info!(user = %session.username, "Logged in");
        Ok(session)
    }

    /// Clear the session everywhere and send the shell to the login view.
    /// Idempotent: on an already-empty session this repeats the navigation
    /// and changes nothing else.
    pub fn logout(&self) {
        self.clear_session();
        self.navigator.navigate(&self.login_path);
    }

    /// Tear down the in-memory and persisted session without navigating.
    /// This is the gateway's entry point on authentication rejection.
    pub fn clear_session(&self) {
        self.lock_session().clear();
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USERNAME_KEY);
        self.storage.remove(USER_ID_KEY);
        debug!("Session cleared");
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock_session().is_authenticated()
    }

    /// Current bearer token; empty when logged out.
    pub fn token(&self) -> String {
        self.lock_session().token.clone()
    }

    pub fn username(&self) -> String {
        self.lock_session().username.clone()
    }

    pub fn user_id(&self) -> i64 {
        self.lock_session().user_id
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.lock_session().clone()
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
