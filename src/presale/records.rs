//! Participant and transaction log rows

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{flag, optional_decimal};

/// A wallet that joined the presale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub walletid: String,
    #[serde(default, deserialize_with = "flag")]
    pub paid: bool,
    #[serde(default)]
    pub col1: Option<String>,
    /// Joining time
    #[serde(default)]
    pub col2: Option<String>,
    /// Total tokens purchased
    #[serde(default)]
    pub col3: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Participant {
    pub fn joined_at(&self) -> Option<&str> {
        self.col2.as_deref().or(self.created_at.as_deref())
    }

    /// Purchased token total, zero when absent or unparseable
    pub fn token_total(&self) -> f64 {
        self.col3
            .as_deref()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(0.0)
    }
}

/// A recorded purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxLog {
    pub id: i64,
    pub walletid: String,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub amount: Option<f64>,
    pub created_at: String,
}

/// Render an ISO-8601 or SQL timestamp in local time, or echo it unchanged
pub fn format_timestamp(value: Option<&str>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return "-".to_string();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return parsed.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    value.to_string()
}
