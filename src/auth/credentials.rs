//! Sources of credentials for re-authenticating an expired session

use async_trait::async_trait;

use super::models::{AdminUser, Credentials};
use crate::config::RefreshConfig;

/// Supplies the email and password used when a token has to be refreshed.
///
/// `user` is the last operator known to the session store.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn credentials(&self, user: &AdminUser) -> Option<Credentials>;
}

/// Never supplies credentials; refresh always fails and forces a new login.
pub struct NoCredentials;

#[async_trait]
impl CredentialProvider for NoCredentials {
    async fn credentials(&self, _user: &AdminUser) -> Option<Credentials> {
        None
    }
}

/// Fixed credentials taken from configuration
pub struct StaticCredentials(Credentials);

impl StaticCredentials {
    pub fn new(credentials: Credentials) -> Self {
        Self(credentials)
    }

    /// Build from the `[refresh]` config section, if it holds credentials
    pub fn from_config(config: &RefreshConfig) -> Option<Self> {
        config
            .credentials()
            .map(|(email, password)| Self(Credentials::new(email, password)))
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    /// Only hands out credentials for the operator the session belongs to
    async fn credentials(&self, user: &AdminUser) -> Option<Credentials> {
        if !self.0.email.eq_ignore_ascii_case(&user.email) {
            tracing::warn!(
                "Refresh credentials belong to {}, stored session is {}; login required",
                self.0.email,
                user.email
            );
            return None;
        }
        Some(self.0.clone())
    }
}
