//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

pub const CONFIG_FILENAME: &str = "presale-admin.toml";

/// Load configuration from presale-admin.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration, falling back to defaults when no file exists
pub fn load_or_default() -> Result<Config> {
    match load_config() {
        Ok(config) => Ok(config),
        Err(Error::ConfigNotFound) => {
            tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<std::path::PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // Constant pattern; a failure here is a bug, not a runtime condition
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# presale-admin configuration

[api]
base_url = "${PRESALE_ADMIN_URL:-http://localhost:5000/api/v1}"
timeout_secs = 30

# [session]
# file = "./.presale-admin/session.json"

# Credentials used to re-authenticate when the backend rejects a token.
# Leave unset to be asked for the password, or to require a fresh login.
[refresh]
email = "${PRESALE_ADMIN_EMAIL:-}"
password = "${PRESALE_ADMIN_PASSWORD:-}"
prompt = true
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_interpolation() {
        env::set_var("PRESALE_TEST_VAR", "hello");
        let content = "value = \"${PRESALE_TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("PRESALE_TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_PRESALE_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_default_content_parses() {
        let config: Config = toml::from_str(&interpolate_env_vars(default_config_content()))
            .expect("default config should parse");
        assert!(config.api.base_url.ends_with("/api/v1"));
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.refresh.prompt);
    }

    #[test]
    fn test_empty_refresh_credentials_are_ignored() {
        let config: Config = toml::from_str(
            r#"
            [refresh]
            email = "ops@example.com"
            password = ""
            "#,
        )
        .unwrap();
        assert!(config.refresh.credentials().is_none());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            "[api]\nbase_url = \"http://backend:8080/api/v2\"\n[session]\nfile = \"s.json\"\n",
        )
        .unwrap();

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.api.base_url, "http://backend:8080/api/v2");
        assert_eq!(config.session.file, std::path::PathBuf::from("s.json"));
        assert_eq!(config.api.timeout_secs, 30);
    }
}
