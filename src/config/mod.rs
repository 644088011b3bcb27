//! Configuration management for presale-admin

pub mod loader;
mod schema;

pub use loader::{load_config, load_or_default};
pub use schema::*;
