//! Authentication models

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Admin identifier. The backend sends either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdminId {
    Number(i64),
    Text(String),
}

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminId::Number(n) => write!(f, "{}", n),
            AdminId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// The operator identity attached to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: AdminId,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl AdminUser {
    /// Check whether the operator holds a permission
    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_active && self.permissions.contains(permission)
    }
}

/// Login and refresh request body
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Body returned by the login and refresh endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub admin: Option<AdminUser>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Request body for creating another operator account
#[derive(Debug, Clone, Serialize)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_user_accepts_numeric_and_string_ids() {
        let numeric: AdminUser = serde_json::from_str(
            r#"{"id":1,"name":"Root","email":"root@example.com","role":"super_admin","permissions":["all"],"isActive":true}"#,
        )
        .unwrap();
        assert_eq!(numeric.id, AdminId::Number(1));
        assert!(numeric.has_permission("all"));

        let text: AdminUser = serde_json::from_str(
            r#"{"id":"a-1","name":"Ops","email":"ops@example.com","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(text.id.to_string(), "a-1");
        assert!(text.permissions.is_empty());
        assert!(text.is_active);
    }

    #[test]
    fn test_admin_user_rejects_wrong_shape() {
        let result: Result<AdminUser, _> = serde_json::from_str(r#"{"id":1,"name":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_inactive_admin_has_no_permissions() {
        let mut user: AdminUser = serde_json::from_str(
            r#"{"id":1,"name":"Root","email":"r@e.com","role":"admin","permissions":["all"]}"#,
        )
        .unwrap();
        user.is_active = false;
        assert!(!user.has_permission("all"));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("ops@example.com", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("ops@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
