use anyhow::Result;
use chrono::{Days, NaiveDate};

use super::SourceCollector;
use crate::models::RawPosting;

/// (company, title, location, url, work arrangement)
const CURATED: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Microsoft",
        "Senior Identity & Access Management Engineer",
        "Redmond, WA",
        "https://careers.microsoft.com/",
        "Onsite",
    ),
    (
        "Okta",
        "Principal IAM Architect",
        "San Francisco, CA",
        "https://www.okta.com/company/careers/",
        "Hybrid",
    ),
    (
        "AWS",
        "Senior Security Engineer - Identity",
        "Seattle, WA",
        "https://www.amazon.jobs/",
        "Hybrid",
    ),
    (
        "Google",
        "Staff Security Engineer, Identity & Access",
        "Mountain View, CA",
        "https://careers.google.com/",
        "Hybrid",
    ),
    (
        "Northeastern University",
        "Senior IAM Engineer",
        "Boston, MA",
        "https://northeastern.wd1.myworkdayjobs.com/careers",
        "Hybrid",
    ),
    (
        "Sailpoint",
        "Identity Security Architect",
        "Austin, TX",
        "https://www.sailpoint.com/company/careers/",
        "Hybrid",
    ),
    (
        "CyberArk",
        "Privileged Access Management Engineer",
        "Remote",
        "https://www.cyberark.com/careers/",
        "Remote",
    ),
    (
        "Raytheon Technologies",
        "Cybersecurity Engineer (IAM)",
        "Arlington, VA",
        "https://careers.rtx.com/",
        "Onsite, top secret clearance required",
    ),
    (
        "JPMorgan Chase",
        "IAM Engineer - Saviynt",
        "New York, NY",
        "https://careers.jpmorgan.com/",
        "Onsite",
    ),
    (
        "Capital One",
        "Senior IAM Engineer",
        "McLean, VA",
        "https://www.capitalonecareers.com/",
        "Onsite",
    ),
];

/// Curated postings from well-known IAM employers, so a deployment without
/// any API credentials still publishes a non-empty list.
pub struct SampleCollector {
    today: NaiveDate,
}

impl SampleCollector {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn postings(&self) -> Vec<RawPosting> {
        CURATED
            .iter()
            .enumerate()
            .map(|(i, (company, title, location, url, arrangement))| {
                let posted = self
                    .today
                    .checked_sub_days(Days::new(2 * i as u64))
                    .unwrap_or(self.today);
                RawPosting {
                    company: Some(company.to_string()),
                    title: Some(title.to_string()),
                    location: Some(location.to_string()),
                    description: Some(format!(
                        "Exciting opportunity at {}. {}.",
                        company, arrangement
                    )),
                    posted: Some(posted.format("%Y-%m-%d").to_string()),
                    url: Some(url.to_string()),
                    source: Some("sample".to_string()),
                    region: None,
                }
            })
            .collect()
    }
}

impl SourceCollector for SampleCollector {
    fn name(&self) -> &str {
        "sample"
    }

    fn collect(&self) -> Result<Vec<RawPosting>> {
        Ok(self.postings())
    }
}
