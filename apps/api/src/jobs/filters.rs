//! Filter translation — maps the app's search vocabulary onto the upstream job API's
//! parameter names and enumerations.
//!
//! Unknown codes are dropped rather than forwarded, so the upstream never sees a value
//! it does not understand.

use serde::Serialize;

use crate::errors::AppError;

/// Geographic id the upstream treats as "worldwide".
pub const WORLDWIDE_GEOID: &str = "92000000";

/// Query parameters accepted by `GET /jobs`.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub field: Option<String>,
    pub location: Option<String>,
    pub geoid: Option<String>,
    pub page: Option<String>,
    pub sort_by: Option<String>,
    pub job_type: Option<String>,
    pub work_type: Option<String>,
    pub exp_level: Option<String>,
    pub filter_by_company: Option<String>,
    pub mock: Option<String>,
}

impl SearchFilter {
    /// Builds a filter from raw query pairs. A repeated key keeps its first value;
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut filter = SearchFilter::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "field" => &mut filter.field,
                "location" => &mut filter.location,
                "geoid" => &mut filter.geoid,
                "page" => &mut filter.page,
                "sort_by" => &mut filter.sort_by,
                "job_type" => &mut filter.job_type,
                "work_type" => &mut filter.work_type,
                "exp_level" => &mut filter.exp_level,
                "filter_by_company" => &mut filter.filter_by_company,
                "mock" => &mut filter.mock,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        filter
    }

    /// `mock=1` forces the sample listings even when an API key is configured.
    pub fn is_mock(&self) -> bool {
        self.mock.as_deref().map(str::trim) == Some("1")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortWindow {
    Day,
    Week,
    Month,
}

impl SortWindow {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "dd" | "day" => Some(SortWindow::Day),
            "week" => Some(SortWindow::Week),
            "month" => Some(SortWindow::Month),
            _ => None,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            SortWindow::Day => "day",
            SortWindow::Week => "week",
            SortWindow::Month => "month",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Temporary,
    Internship,
}

impl JobType {
    /// Single-letter codes: F, P, C, T, I.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "F" => Some(JobType::FullTime),
            "P" => Some(JobType::PartTime),
            "C" => Some(JobType::Contract),
            "T" => Some(JobType::Temporary),
            "I" => Some(JobType::Internship),
            _ => None,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::PartTime => "part_time",
            JobType::Contract => "contract",
            JobType::Temporary => "temporary",
            JobType::Internship => "internship",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkType {
    OnSite,
    Remote,
    Hybrid,
}

impl WorkType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(WorkType::OnSite),
            "2" => Some(WorkType::Remote),
            "3" => Some(WorkType::Hybrid),
            _ => None,
        }
    }

    /// The upstream calls on-site work `at_work`.
    pub fn as_param(self) -> &'static str {
        match self {
            WorkType::OnSite => "at_work",
            WorkType::Remote => "remote",
            WorkType::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceLevel {
    Internship,
    EntryLevel,
    Associate,
    MidSenior,
    Director,
}

impl ExperienceLevel {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(ExperienceLevel::Internship),
            "2" => Some(ExperienceLevel::EntryLevel),
            "3" => Some(ExperienceLevel::Associate),
            "4" => Some(ExperienceLevel::MidSenior),
            "5" => Some(ExperienceLevel::Director),
            _ => None,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            ExperienceLevel::Internship => "internship",
            ExperienceLevel::EntryLevel => "entry_level",
            ExperienceLevel::Associate => "associate",
            ExperienceLevel::MidSenior => "mid_senior_level",
            ExperienceLevel::Director => "director",
        }
    }

    /// Maps a comma-separated code list, silently skipping unknown codes.
    /// Returns `None` when nothing valid remains.
    pub fn join_codes(codes: &str) -> Option<String> {
        let mapped: Vec<&str> = codes
            .split(',')
            .filter_map(Self::from_code)
            .map(Self::as_param)
            .collect();
        (!mapped.is_empty()).then(|| mapped.join(","))
    }
}

/// Parameter set sent to the upstream job API (minus the API key, which the client adds).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpstreamParams {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geoid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_by_company: Option<String>,
}

/// Translates a search filter into upstream parameters.
///
/// Fails with a validation error when `field` is missing or blank.
pub fn translate(filter: &SearchFilter) -> Result<UpstreamParams, AppError> {
    let field = non_blank(&filter.field)
        .ok_or_else(|| AppError::Validation("field is required".to_string()))?;

    let location = non_blank(&filter.location);
    let mut geoid = non_blank(&filter.geoid);
    if location.is_none() && geoid.is_none() {
        geoid = Some(WORLDWIDE_GEOID.to_string());
    }

    Ok(UpstreamParams {
        field,
        location,
        geoid,
        page: page_param(filter.page.as_deref()),
        sort_by: filter
            .sort_by
            .as_deref()
            .and_then(SortWindow::from_code)
            .map(SortWindow::as_param),
        job_type: filter
            .job_type
            .as_deref()
            .and_then(JobType::from_code)
            .map(JobType::as_param),
        work_type: filter
            .work_type
            .as_deref()
            .and_then(WorkType::from_code)
            .map(WorkType::as_param),
        exp_level: non_blank(&filter.exp_level).and_then(|codes| ExperienceLevel::join_codes(&codes)),
        filter_by_company: non_blank(&filter.filter_by_company),
    })
}

/// Blank or missing page means page 1. Any finite positive number is forwarded in
/// canonical form (`1e1` becomes `10`, `2.5` stays as is); anything else is dropped.
fn page_param(raw: Option<&str>) -> Option<String> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or("1");
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Some(n.to_string()),
        _ => None,
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
