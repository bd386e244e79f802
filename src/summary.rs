use std::collections::BTreeMap;

use crate::models::{CanonicalJob, JobType, LocationType, VisaSponsorship};

/// Group counts over the final job list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub by_type: BTreeMap<JobType, usize>,
    pub by_location_type: BTreeMap<LocationType, usize>,
    pub by_visa: BTreeMap<VisaSponsorship, usize>,
    pub by_country: BTreeMap<String, usize>,
}

impl Summary {
    pub fn from_jobs(jobs: &[CanonicalJob]) -> Self {
        let mut summary = Summary::default();
        for job in jobs {
            *summary.by_type.entry(job.job_type).or_default() += 1;
            *summary.by_location_type.entry(job.location_type).or_default() += 1;
            *summary.by_visa.entry(job.visa_sponsorship).or_default() += 1;
            *summary
                .by_country
                .entry(country_of(&job.location).to_string())
                .or_default() += 1;
        }
        summary
    }

    /// Countries by descending count, ties broken alphabetically.
    pub fn top_countries(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut countries: Vec<(&str, usize)> = self
            .by_country
            .iter()
            .map(|(country, count)| (country.as_str(), *count))
            .collect();
        countries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        countries.truncate(limit);
        countries
    }
}

/// Trailing comma-separated segment of a display location.
pub fn country_of(location: &str) -> &str {
    let country = location.rsplit(',').next().unwrap_or(location).trim();
    if country.is_empty() { "Unknown" } else { country }
}
