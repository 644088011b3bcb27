//! Client for the presale admin REST backend

mod client;
mod types;

pub use client::{ApiClient, DEFAULT_PAGE_SIZE};
pub use types::{Ack, Page, Pagination};

use async_trait::async_trait;

use crate::auth::{AuthResponse, Credentials};
use crate::error::Result;

/// The unauthenticated endpoints the session manager depends on
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /admin/login`
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse>;

    /// `POST /admin/refresh-token`
    async fn refresh_token(&self, credentials: &Credentials) -> Result<AuthResponse>;
}
