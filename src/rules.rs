//! Keyword rule tables driving classification.
//!
//! Every axis is an ordered list of `(category, keywords)` pairs; the first rule
//! with a matching keyword wins and an axis with no match falls back to the
//! category's default. The built-in tables can be replaced by a JSON file with
//! the same shape (see `jobmap rules`).

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::{Clearance, JobType, Level, LocationRestriction, LocationType};
use crate::text::contains_any;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule<T> {
    pub category: T,
    pub keywords: Vec<String>,
}

impl<T> KeywordRule<T> {
    fn new(category: T, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        contains_any(text, &self.keywords)
    }
}

/// Category of the first rule matching `text`, in table order.
pub fn first_match<T: Copy>(rules: &[KeywordRule<T>], text: &str) -> Option<T> {
    rules
        .iter()
        .find(|rule| rule.matches(text))
        .map(|rule| rule.category)
}

/// Phrase tables for sponsorship, work authorization and location restrictions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaRules {
    pub positive: Vec<String>,
    /// Any hit forces `not_available`, regardless of positive hits.
    pub negative: Vec<String>,
    pub work_authorization: Vec<String>,
    /// Not exclusive: every matching group contributes its tag.
    pub restrictions: Vec<KeywordRule<LocationRestriction>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rules {
    /// Matched against the title only.
    pub job_type: Vec<KeywordRule<JobType>>,
    /// Matched against the title only.
    pub level: Vec<KeywordRule<Level>>,
    pub clearance: Vec<KeywordRule<Clearance>>,
    pub location_type: Vec<KeywordRule<LocationType>>,
    pub visa: VisaRules,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            job_type: vec![
                KeywordRule::new(
                    JobType::Iam,
                    &[
                        "iam",
                        "identity",
                        "access management",
                        "idm",
                        "pam",
                        "privileged",
                        "okta",
                        "sailpoint",
                        "ping",
                        "saviynt",
                        "cyberark",
                    ],
                ),
                KeywordRule::new(JobType::Architect, &["architect"]),
                KeywordRule::new(JobType::Analyst, &["analyst"]),
                KeywordRule::new(JobType::Consultant, &["consultant"]),
            ],
            level: vec![
                KeywordRule::new(Level::Junior, &["junior", "entry", "associate", "graduate"]),
                KeywordRule::new(Level::Senior, &["senior", "sr.", "sr "]),
                KeywordRule::new(Level::Principal, &["principal", "staff", "distinguished"]),
                KeywordRule::new(Level::Lead, &["lead", "manager", "director", "head"]),
            ],
            clearance: vec![
                KeywordRule::new(Clearance::TsSci, &["ts/sci", "ts-sci", "top secret/sci"]),
                KeywordRule::new(Clearance::Ts, &["top secret", "ts clearance"]),
                KeywordRule::new(
                    Clearance::Secret,
                    &["secret clearance", "security clearance"],
                ),
            ],
            location_type: vec![
                KeywordRule::new(
                    LocationType::Remote,
                    &["remote", "work from home", "wfh", "anywhere"],
                ),
                KeywordRule::new(LocationType::Hybrid, &["hybrid", "flexible"]),
            ],
            visa: VisaRules::default(),
        }
    }
}

impl Default for VisaRules {
    fn default() -> Self {
        let phrases = |list: &[&str]| list.iter().map(|p| p.to_string()).collect::<Vec<_>>();
        Self {
            positive: phrases(&[
                "visa sponsorship",
                "will sponsor",
                "sponsorship available",
                "h1b sponsor",
                "can sponsor",
                "sponsors visas",
                "visa support",
                "immigration support",
                "relocation assistance",
            ]),
            negative: phrases(&[
                "no visa sponsorship",
                "no sponsorship",
                "cannot sponsor",
                "will not sponsor",
                "us citizens only",
                "citizenship required",
                "must be authorized",
                "must be eligible",
                "must have authorization",
                // proxy for citizenship; see DESIGN.md
                "security clearance required",
            ]),
            work_authorization: phrases(&[
                "must be authorized to work",
                "work authorization required",
                "right to work",
                "legally authorized",
                "employment authorization",
                "work permit required",
            ]),
            restrictions: vec![
                KeywordRule::new(
                    LocationRestriction::UsCitizensOnly,
                    &["us citizens only", "u.s. citizens only", "must be us citizen"],
                ),
                KeywordRule::new(
                    LocationRestriction::ClearanceRequired,
                    &["security clearance", "ts/sci", "top secret", "secret clearance"],
                ),
                KeywordRule::new(
                    LocationRestriction::LocalCandidatesPreferred,
                    &["must be located in", "must reside in", "local candidates only"],
                ),
                KeywordRule::new(
                    LocationRestriction::DomesticRemoteOnly,
                    &["us remote only", "uk remote only", "must be in country"],
                ),
            ],
        }
    }
}

impl Rules {
    /// Load rule tables from a JSON file. Keywords are lower-cased on load.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid rules file: {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let rules: Rules = serde_json::from_str(content).context("Failed to parse rules JSON")?;
        let rules = rules.normalized();
        rules.validate()?;
        Ok(rules)
    }

    fn normalized(mut self) -> Self {
        fn lower_rules<T>(rules: &mut [KeywordRule<T>]) {
            for rule in rules {
                lower_all(&mut rule.keywords);
            }
        }
        fn lower_all(keywords: &mut [String]) {
            for keyword in keywords {
                *keyword = keyword.to_lowercase();
            }
        }

        lower_rules(&mut self.job_type);
        lower_rules(&mut self.level);
        lower_rules(&mut self.clearance);
        lower_rules(&mut self.location_type);
        lower_rules(&mut self.visa.restrictions);
        lower_all(&mut self.visa.positive);
        lower_all(&mut self.visa.negative);
        lower_all(&mut self.visa.work_authorization);
        self
    }

    /// An empty keyword is a substring of everything, so it is rejected.
    fn validate(&self) -> Result<()> {
        let groups: Vec<(&str, Vec<&String>)> = vec![
            ("jobType", self.job_type.iter().flat_map(|r| &r.keywords).collect()),
            ("level", self.level.iter().flat_map(|r| &r.keywords).collect()),
            ("clearance", self.clearance.iter().flat_map(|r| &r.keywords).collect()),
            (
                "locationType",
                self.location_type.iter().flat_map(|r| &r.keywords).collect(),
            ),
            ("visa.positive", self.visa.positive.iter().collect()),
            ("visa.negative", self.visa.negative.iter().collect()),
            (
                "visa.workAuthorization",
                self.visa.work_authorization.iter().collect(),
            ),
            (
                "visa.restrictions",
                self.visa.restrictions.iter().flat_map(|r| &r.keywords).collect(),
            ),
        ];

        for (name, keywords) in groups {
            if keywords.iter().any(|k| k.trim().is_empty()) {
                bail!("Empty keyword in '{}' rules", name);
            }
        }
        Ok(())
    }
}
