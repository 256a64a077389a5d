//! Input records supplied by the content-metadata and trend collaborators.
//!
//! Deserialization never fails on a bad field value: view counts that are
//! missing, negative, or unparsable become `0`, and publish dates that are
//! missing or unparsable become `None`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One video returned by a platform search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    /// Title and description joined by a single space.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        match self.description.as_deref() {
            Some(desc) if !desc.is_empty() => format!("{} {desc}", self.title),
            _ => self.title.clone(),
        }
    }

    /// Whole days between publication and `now`, floored at zero.
    ///
    /// Returns `None` when the publish date is unknown.
    #[must_use]
    pub fn age_days(&self, now: DateTime<Utc>) -> Option<i64> {
        self.published_at
            .map(|published| (now - published).num_days().max(0))
    }
}

/// External search-interest signal for the same set of terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSignal {
    /// Relative interest, 0–100.
    #[serde(default)]
    pub interest_score: f64,
    #[serde(default)]
    pub week_over_week_growth_pct: f64,
    #[serde(default)]
    pub is_breakout: bool,
}

impl TrendSignal {
    /// `true` when the signal carries any interest at all.
    #[must_use]
    pub fn has_interest(&self) -> bool {
        self.interest_score.is_finite() && self.interest_score > 0.0
    }

    /// Growth percentage with non-finite values mapped to `0.0`.
    #[must_use]
    pub fn growth_pct(&self) -> f64 {
        if self.week_over_week_growth_pct.is_finite() {
            self.week_over_week_growth_pct
        } else {
            0.0
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_text(&value).unwrap_or_default())
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_text(&value))
}

/// Strings pass through and numbers are rendered; anything else is absent.
pub(crate) fn parse_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_count(&value))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_timestamp))
}

/// Interprets a JSON value as a non-negative count.
///
/// Accepts integers, floats (truncated), and numeric strings with optional
/// thousands separators (`"1,234"`).
pub(crate) fn parse_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(float_to_count))
            .unwrap_or(0),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            cleaned
                .parse::<u64>()
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().and_then(float_to_count))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_count(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0).then(|| f.trunc() as u64)
}

/// Parses RFC 3339 timestamps, falling back to bare `YYYY-MM-DD` dates at midnight UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
