//! Operator authentication and session management

pub mod credentials;
pub mod models;
pub mod session;

pub use credentials::{CredentialProvider, NoCredentials, StaticCredentials};
pub use models::{AdminId, AdminUser, AuthResponse, Credentials, NewAdmin};
pub use session::{Session, SessionManager};
