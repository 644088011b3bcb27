//! Session management
//!
//! `SessionManager` owns the operator session: the bearer token and the admin
//! it belongs to. It is seeded from the session store at startup and is the
//! only writer of that store. `login`, `logout` and `refresh` are serialized
//! against each other; readers only take a short read lock.

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::credentials::CredentialProvider;
use super::models::{AdminUser, AuthResponse, Credentials};
use crate::api::AuthApi;
use crate::error::{Error, Result};
use crate::storage::{Change, SessionStore, TOKEN_KEY, USER_KEY};

/// Token and operator identity. Both are present or neither is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<AdminUser>,
}

impl Session {
    fn new(token: String, user: AdminUser) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        if self.is_authenticated() {
            self.token.as_deref()
        } else {
            None
        }
    }

    pub fn user(&self) -> Option<&AdminUser> {
        if self.is_authenticated() {
            self.user.as_ref()
        } else {
            None
        }
    }
}

/// Owner of the operator session
pub struct SessionManager {
    state: Arc<RwLock<Session>>,
    writer: Arc<Mutex<()>>,
    store: Arc<dyn SessionStore>,
    api: Arc<dyn AuthApi>,
    credentials: Arc<dyn CredentialProvider>,
}

impl SessionManager {
    /// Build the manager and restore any session left in `store`.
    ///
    /// A partial or unreadable stored session is wiped and the manager
    /// starts logged out.
    pub fn load(
        store: Arc<dyn SessionStore>,
        api: Arc<dyn AuthApi>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let session = match read_stored(store.as_ref()) {
            Ok(Some(session)) => {
                tracing::debug!("Restored stored session");
                session
            }
            Ok(None) => {
                clear_store(store.as_ref());
                Session::default()
            }
            Err(e) => {
                tracing::warn!("Discarding stored session: {}", e);
                clear_store(store.as_ref());
                Session::default()
            }
        };

        Self {
            state: Arc::new(RwLock::new(session)),
            writer: Arc::new(Mutex::new(())),
            store,
            api,
            credentials,
        }
    }

    /// Copy of the current session
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token().map(str::to_string)
    }

    pub async fn user(&self) -> Option<AdminUser> {
        self.state.read().await.user().cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    /// Replace the session with `token` and `user` and persist both.
    ///
    /// If the store rejects the write, the previous session is kept both in
    /// memory and on disk.
    pub async fn login(&self, token: impl Into<String>, user: AdminUser) -> Result<()> {
        let _writer = self.writer.lock().await;
        self.commit(token.into(), user).await.map(|_| ())
    }

    /// Exchange credentials for a session via `POST /admin/login`
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AdminUser> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::validation("Please enter both email and password"));
        }

        let _writer = self.writer.lock().await;
        let response = self
            .api
            .login(&Credentials::new(email.trim(), password))
            .await?;
        let (token, user) = accept(response)?;
        self.commit(token, user.clone()).await?;

        tracing::info!("Logged in as {}", user.email);
        Ok(user)
    }

    /// Clear the session in memory and in the store. Safe to call repeatedly.
    pub async fn logout(&self) -> Result<()> {
        let _writer = self.writer.lock().await;
        *self.state.write().await = Session::default();
        self.store
            .apply(&[Change::remove(TOKEN_KEY), Change::remove(USER_KEY)])
    }

    /// Try to obtain a fresh token. Returns whether it worked.
    pub async fn refresh(&self) -> bool {
        self.refresh_session().await.is_some()
    }

    /// Try to obtain a fresh token and return the new session.
    ///
    /// On failure the session is cleared, except when the backend could not
    /// be reached at all.
    pub async fn refresh_session(&self) -> Option<Session> {
        let _writer = self.writer.lock().await;
        self.refresh_locked().await
    }

    /// Refresh after the backend rejected `rejected`, unless another call has
    /// already replaced that token. Then the current session is returned as is.
    pub async fn refresh_rejected(&self, rejected: &str) -> Option<Session> {
        let _writer = self.writer.lock().await;

        let current = self.state.read().await.clone();
        if current.token().is_some_and(|token| token != rejected) {
            tracing::debug!("Token already replaced, skipping refresh");
            return Some(current);
        }
        self.refresh_locked().await
    }

    /// Caller must hold the writer lock.
    async fn refresh_locked(&self) -> Option<Session> {
        match self.try_refresh().await {
            Ok(session) => {
                tracing::info!("Session refreshed");
                Some(session)
            }
            Err(Error::Transport(e)) => {
                tracing::warn!("Token refresh failed, backend unreachable: {}", e);
                None
            }
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                *self.state.write().await = Session::default();
                clear_store(self.store.as_ref());
                None
            }
        }
    }

    async fn try_refresh(&self) -> Result<Session> {
        let stored = self.store.get(USER_KEY)?.ok_or(Error::NoStoredSession)?;
        let user: AdminUser = serde_json::from_str(&stored)?;

        let credentials = self
            .credentials
            .credentials(&user)
            .await
            .ok_or(Error::MissingCredentials)?;

        let response = self.api.refresh_token(&credentials).await?;
        let (token, refreshed) = accept(response)?;
        if !refreshed.email.eq_ignore_ascii_case(&user.email) {
            return Err(Error::LoginRejected(format!(
                "refresh returned {} for a session of {}",
                refreshed.email, user.email
            )));
        }
        self.commit(token, refreshed).await
    }

    /// Persist then publish. Caller must hold the writer lock.
    async fn commit(&self, token: String, user: AdminUser) -> Result<Session> {
        if token.is_empty() {
            return Err(Error::validation("Token must not be empty"));
        }

        let user_json = serde_json::to_string(&user)?;
        self.store.apply(&[
            Change::set(TOKEN_KEY, token.as_str()),
            Change::set(USER_KEY, user_json),
        ])?;

        let session = Session::new(token, user);
        *self.state.write().await = session.clone();
        Ok(session)
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            writer: Arc::clone(&self.writer),
            store: Arc::clone(&self.store),
            api: Arc::clone(&self.api),
            credentials: Arc::clone(&self.credentials),
        }
    }
}

/// Turn a login or refresh body into a token and user
fn accept(response: AuthResponse) -> Result<(String, AdminUser)> {
    if !response.success {
        return Err(Error::LoginRejected(
            response
                .message
                .unwrap_or_else(|| "Invalid credentials".to_string()),
        ));
    }

    match (response.token, response.admin) {
        (Some(token), Some(admin)) if !token.is_empty() => Ok((token, admin)),
        _ => Err(Error::InvalidResponse {
            endpoint: "auth".to_string(),
            message: "missing token or admin".to_string(),
        }),
    }
}

fn read_stored(store: &dyn SessionStore) -> Result<Option<Session>> {
    let token = store.get(TOKEN_KEY)?;
    let user = store.get(USER_KEY)?;

    match (token, user) {
        (Some(token), Some(user)) if !token.is_empty() => {
            let user: AdminUser = serde_json::from_str(&user)?;
            Ok(Some(Session::new(token, user)))
        }
        _ => Ok(None),
    }
}

fn clear_store(store: &dyn SessionStore) {
    if let Err(e) = store.apply(&[Change::remove(TOKEN_KEY), Change::remove(USER_KEY)]) {
        tracing::warn!("Failed to clear stored session: {}", e);
    }
}
