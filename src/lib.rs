//! Presale Admin - operate a token presale from the terminal
//!
//! This is the library interface for presale-admin: the session store and
//! manager, the backend client with its refresh-and-retry wrapper, and the
//! presale models with their client-side validation.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod presale;
pub mod retry;
pub mod storage;

pub use api::ApiClient;
pub use auth::SessionManager;
pub use config::Config;
pub use error::Error;
