//! Purchase limits, hard cap and sale window

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::countdown::{format_backend_date, normalize_target_date};
use crate::error::{Error, Result};

/// Partial update of the presale settings. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresaleSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_purchase: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_purchase: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl PresaleSettings {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check the update and rewrite both dates in backend format
    pub fn normalized(&self) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::validation("Nothing to update: set at least one presale setting"));
        }

        for (name, value) in [
            ("Minimum purchase", self.min_purchase),
            ("Maximum purchase", self.max_purchase),
            ("Hard cap", self.hard_cap),
        ] {
            if let Some(value) = value {
                if !(value.is_finite() && value > 0.0) {
                    return Err(Error::validation(format!("{} must be greater than 0", name)));
                }
            }
        }

        if let (Some(min), Some(max)) = (self.min_purchase, self.max_purchase) {
            if max < min {
                return Err(Error::validation(
                    "Maximum purchase must not be below the minimum purchase",
                ));
            }
        }
        if let (Some(max), Some(cap)) = (self.max_purchase, self.hard_cap) {
            if max > cap {
                return Err(Error::validation("Maximum purchase must not exceed the hard cap"));
            }
        }

        let start_date = self.start_date.as_deref().map(sale_date).transpose()?;
        let end_date = self.end_date.as_deref().map(sale_date).transpose()?;
        if let (Some(start), Some(end)) = (&start_date, &end_date) {
            // Backend format sorts chronologically
            if end <= start {
                return Err(Error::validation("End date must be after the start date"));
            }
        }

        Ok(Self {
            start_date,
            end_date,
            ..self.clone()
        })
    }
}

/// `YYYY-MM-DD` means midnight; anything else goes through the countdown date rules
fn sale_date(value: &str) -> Result<String> {
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(day) => Ok(format_backend_date(day.and_time(NaiveTime::MIN))),
        Err(_) => normalize_target_date(value),
    }
}

/// Price of one presale stage
pub fn validate_stage_price(stage: u8, price: f64) -> Result<()> {
    if !(1..=super::tokenomics::STAGE_COUNT as u8).contains(&stage) {
        return Err(Error::validation("Stage must be between 1 and 5"));
    }
    if !(price.is_finite() && price > 0.0) {
        return Err(Error::validation("Price must be greater than 0"));
    }
    Ok(())
}
