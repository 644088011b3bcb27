//! Presale campaign settings and records
//!
//! Each submodule holds the wire type for one admin screen together with the
//! client-side checks that run before anything is sent to the backend.

pub mod countdown;
pub mod dashboard;
pub mod live_stats;
pub mod records;
pub mod settings;
pub mod tokenomics;

pub use countdown::{CountdownPreset, CountdownSettings, BACKEND_DATE_FORMAT};
pub use dashboard::DashboardStats;
pub use live_stats::LiveStats;
pub use records::{Participant, TxLog};
pub use settings::{validate_stage_price, PresaleSettings};
pub use tokenomics::{Distribution, Tokenomics};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

// Rows come from SQL columns: any of them may be `null`, booleans may be
// `1`/`0`, and DECIMAL or BIGINT values may be sent as strings.

pub(crate) fn default_true() -> bool {
    true
}

/// Booleans as `true`/`false`, `1`/`0` or `"1"`/`"true"`; `null` is `None`
pub(crate) fn optional_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(i64),
        Text(String),
    }

    Ok(Option::<Flag>::deserialize(deserializer)?.map(|flag| match flag {
        Flag::Bool(b) => b,
        Flag::Number(n) => n != 0,
        Flag::Text(s) => matches!(s.trim(), "1" | "true"),
    }))
}

/// Lenient boolean, `null` reads as false
pub(crate) fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_flag(deserializer)?.unwrap_or(false))
}

/// Lenient activity switch, `null` reads as active
pub(crate) fn active<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_flag(deserializer)?.unwrap_or(true))
}

/// Text column, `null` reads as empty
pub(crate) fn text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decimal as a number or numeric string; `null` and blank strings are `None`
pub(crate) fn optional_decimal<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    match Option::<Decimal>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Decimal::Number(n)) => Ok(Some(n)),
        Some(Decimal::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Decimal::Text(s)) => s.trim().parse().map(Some).map_err(D::Error::custom),
    }
}

/// Lenient decimal, `null` reads as zero
pub(crate) fn decimal<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_decimal(deserializer)?.unwrap_or(0.0))
}

/// Non-negative whole number as a number or string (`"1000"`, `"1000.00"`);
/// `null` and blank strings are `None`
pub(crate) fn optional_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Whole(u64),
        Number(f64),
        Text(String),
    }

    fn whole(value: f64) -> Option<u64> {
        (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
            .then_some(value as u64)
    }

    match Option::<Count>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Count::Whole(n)) => Ok(Some(n)),
        Some(Count::Number(n)) => whole(n)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a whole number, got {}", n))),
        Some(Count::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Count::Text(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(whole))
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("expected a whole number, got '{}'", s)))
        }
    }
}

/// Lenient whole number, `null` reads as zero
pub(crate) fn count<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + Default,
{
    match optional_count(deserializer)? {
        None => Ok(T::default()),
        Some(n) => T::try_from(n).map_err(|_| D::Error::custom(format!("{} is out of range", n))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "flag")]
        active: bool,
        #[serde(deserialize_with = "decimal")]
        amount: f64,
    }

    #[test]
    fn test_lenient_columns() {
        let row: Row = serde_json::from_str(r#"{"active":1,"amount":"12.5"}"#).unwrap();
        assert!(row.active);
        assert_eq!(row.amount, 12.5);

        let row: Row = serde_json::from_str(r#"{"active":false,"amount":3}"#).unwrap();
        assert!(!row.active);
        assert_eq!(row.amount, 3.0);

        assert!(serde_json::from_str::<Row>(r#"{"active":0,"amount":"lots"}"#).is_err());
    }

    #[derive(Deserialize)]
    struct Nullable {
        #[serde(default, deserialize_with = "text")]
        name: String,
        #[serde(default, deserialize_with = "count")]
        days: u32,
        #[serde(default = "default_true", deserialize_with = "active")]
        enabled: bool,
        #[serde(default, deserialize_with = "flag")]
        paid: bool,
    }

    #[test]
    fn test_null_columns_read_as_defaults() {
        let row: Nullable =
            serde_json::from_str(r#"{"name":null,"days":null,"enabled":null,"paid":null}"#).unwrap();
        assert_eq!(row.name, "");
        assert_eq!(row.days, 0);
        assert!(row.enabled);
        assert!(!row.paid);
    }

    #[test]
    fn test_counts_from_strings() {
        let row: Nullable = serde_json::from_str(r#"{"days":"14"}"#).unwrap();
        assert_eq!(row.days, 14);
        let row: Nullable = serde_json::from_str(r#"{"days":"14.00"}"#).unwrap();
        assert_eq!(row.days, 14);
        let row: Nullable = serde_json::from_str(r#"{"days":7.0}"#).unwrap();
        assert_eq!(row.days, 7);

        assert!(serde_json::from_str::<Nullable>(r#"{"days":"1.5"}"#).is_err());
        assert!(serde_json::from_str::<Nullable>(r#"{"days":-3}"#).is_err());
        assert!(serde_json::from_str::<Nullable>(r#"{"days":"5000000000"}"#).is_err());
    }
}
