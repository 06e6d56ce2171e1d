//! Result normalizer — reshapes the upstream's loosely-typed listings into `JobRecord`s.
//!
//! Each output field is described by a `FieldRule`: an ordered list of upstream keys
//! tried in sequence, the first non-empty value winning, plus a placeholder used when
//! none of them carry a value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A normalized job listing as served to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    #[serde(rename = "type")]
    pub employment_type: String,
    pub posted: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub is_remote: bool,
    pub is_featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Ordered upstream candidates for one output field.
pub struct FieldRule {
    pub candidates: &'static [&'static str],
}

impl FieldRule {
    /// First candidate with a non-empty value, stringified.
    pub fn text(&self, raw: &Map<String, Value>) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|key| raw.get(*key))
            .find_map(text_of)
    }

    /// Like `text`, but falls back to `placeholder`.
    pub fn text_or(&self, raw: &Map<String, Value>, placeholder: &str) -> String {
        self.text(raw).unwrap_or_else(|| placeholder.to_string())
    }

    /// First candidate carrying a non-zero number (numeric strings accepted).
    pub fn number(&self, raw: &Map<String, Value>) -> Option<f64> {
        self.candidates
            .iter()
            .filter_map(|key| raw.get(*key))
            .find_map(number_of)
    }
}

pub const ID: FieldRule = FieldRule { candidates: &["job_id", "id"] };
pub const TITLE: FieldRule = FieldRule { candidates: &["job_position", "title"] };
pub const COMPANY: FieldRule = FieldRule { candidates: &["company_name", "company"] };
pub const LOCATION: FieldRule = FieldRule { candidates: &["job_location", "location"] };
pub const SALARY: FieldRule = FieldRule { candidates: &["salary", "pay"] };
pub const EMPLOYMENT_TYPE: FieldRule = FieldRule { candidates: &["job_type", "employment_type"] };
pub const POSTED: FieldRule = FieldRule { candidates: &["job_posting_date", "posted_time"] };
pub const DESCRIPTION: FieldRule = FieldRule { candidates: &["description", "snippet"] };
pub const RATING: FieldRule = FieldRule { candidates: &["rating"] };
pub const MATCH_PERCENT: FieldRule = FieldRule { candidates: &["match", "score"] };
pub const APPLY_URL: FieldRule = FieldRule { candidates: &["job_link", "job_url", "url"] };
pub const LOGO: FieldRule = FieldRule { candidates: &["company_logo"] };
/// Location text scanned for the remote flag.
pub const REMOTE_SOURCE: FieldRule = FieldRule { candidates: &["location", "job_location"] };

/// Placeholder for missing salary, location, and employment type.
pub const DASH: &str = "—";

/// Normalizes an upstream response body. Accepts a bare array or `{ "jobs": [...] }`;
/// anything else yields an empty list.
pub fn normalize_response(body: &Value) -> Vec<JobRecord> {
    let listings = match body {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => match obj.get("jobs") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    listings
        .iter()
        .enumerate()
        .map(|(idx, item)| normalize_listing(idx, item))
        .collect()
}

/// Normalizes one listing; `idx` becomes the id when the upstream supplies none.
pub fn normalize_listing(idx: usize, item: &Value) -> JobRecord {
    let empty = Map::new();
    let raw = item.as_object().unwrap_or(&empty);

    JobRecord {
        id: ID.text(raw).unwrap_or_else(|| idx.to_string()),
        title: TITLE.text_or(raw, "Job"),
        company: COMPANY.text_or(raw, "Company"),
        location: LOCATION.text_or(raw, DASH),
        salary: SALARY.text_or(raw, DASH),
        employment_type: EMPLOYMENT_TYPE.text_or(raw, DASH),
        posted: POSTED.text_or(raw, "Recently"),
        description: DESCRIPTION.text_or(raw, ""),
        rating: RATING.number(raw),
        is_remote: REMOTE_SOURCE.text(raw).is_some_and(|loc| is_remote_location(&loc)),
        is_featured: false,
        match_percent: MATCH_PERCENT.number(raw),
        apply_url: APPLY_URL.text(raw),
        logo: LOGO.text(raw),
    }
}

/// Case-insensitive substring match for "remote".
pub fn is_remote_location(location: &str) -> bool {
    location.to_lowercase().contains("remote")
}

/// Stringifies a value if it counts as present: empty strings, zero, `false`, and
/// `null` do not.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn number_of(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n != 0.0 && n.is_finite()).then_some(n)
}
