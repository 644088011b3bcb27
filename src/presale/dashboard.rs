//! Aggregate figures for the dashboard screen

use serde::{Deserialize, Serialize};

use super::count;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "count")]
    pub total_users: u64,
    #[serde(default, deserialize_with = "count")]
    pub paid_users: u64,
    #[serde(default, deserialize_with = "count")]
    pub unpaid_users: u64,
    #[serde(default)]
    pub presale_info: serde_json::Value,
}

impl DashboardStats {
    /// Share of users who have paid, rounded to a whole percent
    pub fn success_rate(&self) -> u64 {
        if self.total_users == 0 {
            return 0;
        }
        ((self.paid_users as f64 / self.total_users as f64) * 100.0).round() as u64
    }
}
