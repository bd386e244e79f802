use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Attributes, CanonicalJob, RawPosting, VisaAssessment};

pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNTITLED_POSITION: &str = "Untitled Position";
pub const REMOTE_LOCATION: &str = "Remote";
pub const MISSING_URL: &str = "#";
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Maximum description length, in characters.
    pub description_limit: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
        }
    }
}

/// Why a raw posting did not become a canonical job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("record has no company, title, location, description, date or url")]
    Blank,
}

/// Assemble a canonical job from a raw posting and its classifier outputs.
///
/// Missing fields take their documented defaults; `today` stands in for a
/// missing posting date. Only a record with no content at all is rejected.
pub fn build(
    raw: &RawPosting,
    attributes: Attributes,
    visa: VisaAssessment,
    options: &BuildOptions,
    today: NaiveDate,
) -> Result<CanonicalJob, SkipReason> {
    if raw.is_blank() {
        return Err(SkipReason::Blank);
    }

    let location = present(&raw.location)
        .or_else(|| present(&raw.region))
        .unwrap_or(REMOTE_LOCATION);

    Ok(CanonicalJob {
        company: present(&raw.company).unwrap_or(UNKNOWN_COMPANY).to_string(),
        title: present(&raw.title).unwrap_or(UNTITLED_POSITION).to_string(),
        location: location.to_string(),
        location_type: attributes.location_type,
        job_type: attributes.job_type,
        level: attributes.level,
        clearance: attributes.clearance,
        visa_sponsorship: visa.sponsorship,
        work_auth_required: visa.work_auth_required,
        location_restrictions: visa.restrictions,
        posted: normalize_posted(raw.posted.as_deref(), today),
        url: present(&raw.url).unwrap_or(MISSING_URL).to_string(),
        description: truncate_chars(raw.description.as_deref().unwrap_or(""), options.description_limit),
    })
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Reduce a timestamp to its `YYYY-MM-DD` date. Values without a leading ISO date
/// are passed through unchanged; they will not sort correctly.
pub fn normalize_posted(posted: Option<&str>, today: NaiveDate) -> String {
    let Some(value) = posted.map(str::trim).filter(|v| !v.is_empty()) else {
        return today.format("%Y-%m-%d").to_string();
    };

    let head = value.get(..10).unwrap_or(value);
    match NaiveDate::parse_from_str(head, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => value.to_string(),
    }
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
