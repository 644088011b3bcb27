//! Interactive prompts

use async_trait::async_trait;
use dialoguer::{theme::ColorfulTheme, Input, Password};

use crate::auth::{AdminUser, CredentialProvider, Credentials};

/// Asks the operator to re-enter their password when the token expires
pub struct PromptCredentials;

#[async_trait]
impl CredentialProvider for PromptCredentials {
    async fn credentials(&self, user: &AdminUser) -> Option<Credentials> {
        let email = user.email.clone();
        let prompt = format!("Session expired. Password for {}", email);

        let password = tokio::task::spawn_blocking(move || {
            Password::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
        })
        .await
        .ok()?
        .ok()?;

        if password.is_empty() {
            return None;
        }
        Some(Credentials::new(email, password))
    }
}

/// Read an email, using `preset` when given
pub fn email(preset: Option<String>) -> anyhow::Result<String> {
    match preset {
        Some(email) => Ok(email),
        None => Ok(Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Email")
            .interact_text()?),
    }
}

/// Read a password, using `preset` when given
pub fn password(preset: Option<String>) -> anyhow::Result<String> {
    match preset {
        Some(password) => Ok(password),
        None => Ok(Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?),
    }
}
