//! User profile stored as metadata on the identity record. There is no separate
//! table: reads come from `user_metadata`, saves merge into it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileData {
    pub first_name: String,
    pub last_name: String,
    pub headline: String,
    pub location: String,
    pub bio: String,
    pub resume_url: String,
    pub experience: Vec<Value>,
    pub education: Vec<Value>,
    pub skills: Vec<String>,
    pub links: ProfileLinks,
    pub preferences: JobPreferences,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<bool>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ProfileData {
    /// Reads a profile out of identity metadata. Malformed fields fall back to
    /// defaults instead of failing the whole read.
    pub fn from_metadata(metadata: &Value) -> Self {
        if let Ok(profile) = serde_json::from_value::<ProfileData>(metadata.clone()) {
            return profile;
        }
        let text = |key: &str| {
            metadata
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let list = |key: &str| {
            metadata
                .get(key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        };
        ProfileData {
            first_name: text("firstName"),
            last_name: text("lastName"),
            headline: text("headline"),
            location: text("location"),
            bio: text("bio"),
            resume_url: text("resumeUrl"),
            experience: list("experience"),
            education: list("education"),
            skills: list("skills")
                .into_iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
            links: metadata
                .get("links")
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or_default(),
            preferences: metadata
                .get("preferences")
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or_default(),
        }
    }

    /// Metadata payload for a save: the profile plus its computed completeness.
    pub fn to_metadata(&self) -> Value {
        let mut metadata = serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()));
        if let Value::Object(map) = &mut metadata {
            map.insert("completeness".to_string(), Value::from(self.completeness()));
        }
        metadata
    }

    /// Percentage of the twelve profile checks that are satisfied.
    pub fn completeness(&self) -> u8 {
        let filled_text = |s: &str| !s.trim().is_empty();
        let present = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.is_empty());

        let checks = [
            filled_text(self.first_name.as_str()),
            filled_text(self.last_name.as_str()),
            filled_text(self.headline.as_str()),
            filled_text(self.location.as_str()),
            filled_text(self.bio.as_str()),
            !self.resume_url.is_empty(),
            !self.experience.is_empty(),
            !self.education.is_empty(),
            self.skills.len() > 2,
            present(&self.links.linkedin),
            present(&self.preferences.desired_role),
            present(&self.preferences.desired_location) || self.preferences.remote == Some(true),
        ];

        let filled = checks.iter().filter(|c| **c).count();
        ((filled as f64 / checks.len() as f64) * 100.0).round() as u8
    }
}
