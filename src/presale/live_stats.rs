//! Live statistics displayed on the presale page

use serde::{Deserialize, Serialize};

use super::{active, count, decimal, default_true, text};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveStats {
    #[serde(default, deserialize_with = "count")]
    pub participants: u64,
    #[serde(default, deserialize_with = "decimal")]
    pub raised_amount: f64,
    #[serde(default, deserialize_with = "text")]
    pub tokens_allocated: String,
    #[serde(default, deserialize_with = "count")]
    pub days_to_launch: u32,
    #[serde(default = "default_true", deserialize_with = "active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Default for LiveStats {
    fn default() -> Self {
        Self {
            participants: 0,
            raised_amount: 0.0,
            tokens_allocated: String::new(),
            days_to_launch: 0,
            is_active: true,
            updated_at: None,
        }
    }
}

impl LiveStats {
    /// Every displayed figure must be filled in before saving
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.participants == 0 {
            missing.push("participants");
        }
        if !(self.raised_amount.is_finite() && self.raised_amount > 0.0) {
            missing.push("raised amount");
        }
        if self.tokens_allocated.trim().is_empty() {
            missing.push("tokens allocated");
        }
        if self.days_to_launch == 0 {
            missing.push("days to launch");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "All fields are required (missing: {})",
                missing.join(", ")
            )))
        }
    }

    /// Raised amount as shown on the page, in thousands
    pub fn raised_display(&self) -> String {
        format!("${:.0}K", self.raised_amount / 1000.0)
    }
}
