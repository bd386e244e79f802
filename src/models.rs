use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A posting as handed over by a source collector. Nothing is guaranteed present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPosting {
    pub company: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub posted: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    /// Display name of the country/region the collector searched, if any.
    pub region: Option<String>,
}

impl RawPosting {
    /// True when every field is absent or whitespace.
    pub fn is_blank(&self) -> bool {
        [
            &self.company,
            &self.title,
            &self.location,
            &self.description,
            &self.posted,
            &self.url,
        ]
        .iter()
        .all(|field| field.as_deref().is_none_or(|v| v.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Iam,
    Architect,
    Analyst,
    Consultant,
    #[default]
    Security,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Junior,
    #[default]
    Mid,
    Senior,
    Principal,
    Lead,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Clearance {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "secret")]
    Secret,
    #[serde(rename = "ts")]
    Ts,
    #[serde(rename = "ts-sci")]
    TsSci,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    #[default]
    Onsite,
    Hybrid,
    Remote,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisaSponsorship {
    Available,
    NotAvailable,
    #[default]
    Unknown,
}

/// Ordering follows declaration order, which is also the order tags are listed in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LocationRestriction {
    #[serde(rename = "US Citizens Only")]
    UsCitizensOnly,
    #[serde(rename = "Security Clearance Required")]
    ClearanceRequired,
    #[serde(rename = "Local Candidates Preferred")]
    LocalCandidatesPreferred,
    #[serde(rename = "Domestic Remote Only")]
    DomesticRemoteOnly,
}

macro_rules! wire_names {
    ($ty:ty { $($variant:path => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }
    };
}

wire_names!(JobType {
    JobType::Iam => "iam",
    JobType::Architect => "architect",
    JobType::Analyst => "analyst",
    JobType::Consultant => "consultant",
    JobType::Security => "security",
});

wire_names!(Level {
    Level::Junior => "junior",
    Level::Mid => "mid",
    Level::Senior => "senior",
    Level::Principal => "principal",
    Level::Lead => "lead",
});

wire_names!(Clearance {
    Clearance::None => "none",
    Clearance::Secret => "secret",
    Clearance::Ts => "ts",
    Clearance::TsSci => "ts-sci",
});

wire_names!(LocationType {
    LocationType::Onsite => "onsite",
    LocationType::Hybrid => "hybrid",
    LocationType::Remote => "remote",
});

wire_names!(VisaSponsorship {
    VisaSponsorship::Available => "available",
    VisaSponsorship::NotAvailable => "not_available",
    VisaSponsorship::Unknown => "unknown",
});

wire_names!(LocationRestriction {
    LocationRestriction::UsCitizensOnly => "US Citizens Only",
    LocationRestriction::ClearanceRequired => "Security Clearance Required",
    LocationRestriction::LocalCandidatesPreferred => "Local Candidates Preferred",
    LocationRestriction::DomesticRemoteOnly => "Domestic Remote Only",
});

/// Output of the attribute classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attributes {
    pub job_type: JobType,
    pub level: Level,
    pub clearance: Clearance,
    pub location_type: LocationType,
}

/// Output of the visa sponsorship detector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisaAssessment {
    pub sponsorship: VisaSponsorship,
    pub work_auth_required: bool,
    pub restrictions: BTreeSet<LocationRestriction>,
}

/// The canonical, classified record written to the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalJob {
    pub company: String,
    pub title: String,
    pub location: String,
    pub location_type: LocationType,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub level: Level,
    pub clearance: Clearance,
    #[serde(default)]
    pub visa_sponsorship: VisaSponsorship,
    #[serde(default)]
    pub work_auth_required: bool,
    #[serde(default)]
    pub location_restrictions: BTreeSet<LocationRestriction>,
    pub posted: String,
    pub url: String,
    pub description: String,
}

/// Field set written to the artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputSchema {
    /// Core fields only, without visa sponsorship data
    Basic,
    /// Core fields plus visaSponsorship, workAuthRequired and locationRestrictions
    #[default]
    Visa,
}

/// A job as written under the basic schema.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicJobRecord<'a> {
    pub company: &'a str,
    pub title: &'a str,
    pub location: &'a str,
    pub location_type: LocationType,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub level: Level,
    pub clearance: Clearance,
    pub posted: &'a str,
    pub url: &'a str,
    pub description: &'a str,
}

impl<'a> From<&'a CanonicalJob> for BasicJobRecord<'a> {
    fn from(job: &'a CanonicalJob) -> Self {
        Self {
            company: &job.company,
            title: &job.title,
            location: &job.location,
            location_type: job.location_type,
            job_type: job.job_type,
            level: job.level,
            clearance: job.clearance,
            posted: &job.posted,
            url: &job.url,
            description: &job.description,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum JobRecord<'a> {
    Basic(BasicJobRecord<'a>),
    Visa(&'a CanonicalJob),
}

impl<'a> JobRecord<'a> {
    pub fn new(job: &'a CanonicalJob, schema: OutputSchema) -> Self {
        match schema {
            OutputSchema::Basic => JobRecord::Basic(job.into()),
            OutputSchema::Visa => JobRecord::Visa(job),
        }
    }
}

/// The emitted artifact: `{lastUpdate, jobs}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsFile {
    pub last_update: String,
    pub jobs: Vec<CanonicalJob>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> CanonicalJob {
        CanonicalJob {
            company: "Okta".to_string(),
            title: "Senior IAM Engineer".to_string(),
            location: "San Francisco, United States".to_string(),
            location_type: LocationType::Remote,
            job_type: JobType::Iam,
            level: Level::Senior,
            clearance: Clearance::TsSci,
            visa_sponsorship: VisaSponsorship::NotAvailable,
            work_auth_required: true,
            location_restrictions: [
                LocationRestriction::DomesticRemoteOnly,
                LocationRestriction::UsCitizensOnly,
            ]
            .into_iter()
            .collect(),
            posted: "2024-05-01".to_string(),
            url: "https://example.com/1".to_string(),
            description: "remote".to_string(),
        }
    }

    #[test]
    fn test_canonical_job_wire_names() {
        let value = serde_json::to_value(job()).unwrap();
        assert_eq!(value["type"], "iam");
        assert_eq!(value["locationType"], "remote");
        assert_eq!(value["clearance"], "ts-sci");
        assert_eq!(value["visaSponsorship"], "not_available");
        assert_eq!(value["workAuthRequired"], true);
        assert_eq!(
            value["locationRestrictions"],
            serde_json::json!(["US Citizens Only", "Domestic Remote Only"])
        );
    }

    #[test]
    fn test_basic_schema_omits_visa_fields() {
        let job = job();
        let value = serde_json::to_value(JobRecord::new(&job, OutputSchema::Basic)).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("visaSponsorship"));
        assert!(!object.contains_key("workAuthRequired"));
        assert!(!object.contains_key("locationRestrictions"));
        assert_eq!(object["type"], "iam");
        assert_eq!(object.len(), 10);
    }

    #[test]
    fn test_visa_schema_has_all_fields() {
        let job = job();
        let value = serde_json::to_value(JobRecord::new(&job, OutputSchema::Visa)).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 13);
    }

    #[test]
    fn test_display_matches_wire_name() {
        for clearance in [Clearance::None, Clearance::Secret, Clearance::Ts, Clearance::TsSci] {
            let wire = serde_json::to_value(clearance).unwrap();
            assert_eq!(wire, clearance.to_string());
        }
        assert_eq!(VisaSponsorship::NotAvailable.to_string(), "not_available");
    }

    #[test]
    fn test_blank_posting() {
        assert!(RawPosting::default().is_blank());
        let whitespace = RawPosting {
            title: Some("   ".to_string()),
            source: Some("adzuna".to_string()),
            ..Default::default()
        };
        assert!(whitespace.is_blank());
        let titled = RawPosting {
            title: Some("IAM Engineer".to_string()),
            ..Default::default()
        };
        assert!(!titled.is_blank());
    }
}
