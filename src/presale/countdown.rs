//! Countdown timer settings
//!
//! The backend stores `target_date` as local wall-clock time in the form
//! `YYYY-MM-DD HH:MM:SS`, without a timezone.

use chrono::{Duration, Local, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::{active, default_true, text};
use crate::error::{Error, Result};

/// chrono format string for the backend's date representation
pub const BACKEND_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format accepted from `<input type="datetime-local">` style values
const LOCAL_INPUT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Countdown shown on the public presale page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownSettings {
    #[serde(default, deserialize_with = "text")]
    pub target_date: String,
    #[serde(default, deserialize_with = "text")]
    pub title: String,
    #[serde(default, deserialize_with = "text")]
    pub description: String,
    #[serde(default = "default_true", deserialize_with = "active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            target_date: String::new(),
            title: String::new(),
            description: String::new(),
            is_active: true,
            updated_at: None,
        }
    }
}

impl CountdownSettings {
    /// Check the form before it is submitted
    pub fn validate(&self) -> Result<()> {
        if self.target_date.trim().is_empty() {
            return Err(Error::validation("Target date is required"));
        }
        parse_backend_date(&self.target_date)?;
        Ok(())
    }

    /// Parsed target, if the stored value is well formed
    pub fn target(&self) -> Option<NaiveDateTime> {
        parse_backend_date(&self.target_date).ok()
    }

    /// Time left until the target, relative to `now`. Negative once passed.
    pub fn remaining_from(&self, now: NaiveDateTime) -> Option<Duration> {
        self.target().map(|target| target - now)
    }
}

/// Quick target presets, relative to the current local time
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CountdownPreset {
    #[value(name = "24h")]
    Hours24,
    #[value(name = "7d")]
    Days7,
    #[value(name = "30d")]
    Days30,
}

impl CountdownPreset {
    pub fn offset(self) -> Duration {
        match self {
            CountdownPreset::Hours24 => Duration::hours(24),
            CountdownPreset::Days7 => Duration::days(7),
            CountdownPreset::Days30 => Duration::days(30),
        }
    }

    /// Target date `offset` after `now`, in backend format
    pub fn target_from(self, now: NaiveDateTime) -> String {
        format_backend_date(now + self.offset())
    }

    /// Target date relative to the local clock
    pub fn target(self) -> String {
        self.target_from(Local::now().naive_local())
    }
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$")
            .expect("Invalid regex pattern - this is a bug in the codebase")
    })
}

/// Render a local timestamp in backend format
pub fn format_backend_date(value: NaiveDateTime) -> String {
    value.format(BACKEND_DATE_FORMAT).to_string()
}

/// Parse a backend date, requiring the exact `YYYY-MM-DD HH:MM:SS` shape
pub fn parse_backend_date(value: &str) -> Result<NaiveDateTime> {
    if !date_pattern().is_match(value) {
        return Err(Error::validation(format!(
            "Invalid date format '{}'. Expected YYYY-MM-DD HH:MM:SS",
            value
        )));
    }
    NaiveDateTime::parse_from_str(value, BACKEND_DATE_FORMAT)
        .map_err(|_| Error::validation(format!("'{}' is not a valid date and time", value)))
}

/// Accept either backend format or `YYYY-MM-DDTHH:MM[:SS]` and return backend format
pub fn normalize_target_date(value: &str) -> Result<String> {
    let value = value.trim();
    if let Ok(parsed) = parse_backend_date(value) {
        return Ok(format_backend_date(parsed));
    }
    LOCAL_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(format_backend_date)
        .ok_or_else(|| {
            Error::validation(format!(
                "Invalid date format '{}'. Expected YYYY-MM-DD HH:MM:SS",
                value
            ))
        })
}
