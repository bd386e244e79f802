use std::collections::HashSet;

use crate::models::CanonicalJob;

/// Identity of a listing: lower-cased, trimmed (company, title).
/// Location and source do not take part.
pub fn identity_key(job: &CanonicalJob) -> (String, String) {
    (
        job.company.trim().to_lowercase(),
        job.title.trim().to_lowercase(),
    )
}

/// Keep the first occurrence of each identity key, preserving order.
/// Returns the retained jobs and the number dropped.
pub fn deduplicate(jobs: Vec<CanonicalJob>) -> (Vec<CanonicalJob>, usize) {
    let mut seen = HashSet::new();
    let total = jobs.len();

    let unique: Vec<CanonicalJob> = jobs
        .into_iter()
        .filter(|job| seen.insert(identity_key(job)))
        .collect();

    let removed = total - unique.len();
    (unique, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Clearance, JobType, Level, LocationType, VisaSponsorship};
    use proptest::prelude::*;

    fn job(company: &str, title: &str, location: &str) -> CanonicalJob {
        CanonicalJob {
            company: company.to_string(),
            title: title.to_string(),
            location: location.to_string(),
            location_type: LocationType::Onsite,
            job_type: JobType::Security,
            level: Level::Mid,
            clearance: Clearance::None,
            visa_sponsorship: VisaSponsorship::Unknown,
            work_auth_required: false,
            location_restrictions: Default::default(),
            posted: "2024-01-01".to_string(),
            url: "#".to_string(),
            description: String::new(),
        }
    }

    fn names(jobs: &[CanonicalJob]) -> Vec<(&str, &str)> {
        jobs.iter()
            .map(|j| (j.company.as_str(), j.title.as_str()))
            .collect()
    }

    #[test]
    fn test_first_occurrence_retained() {
        let jobs = vec![
            job("Acme", "Engineer", "Boston"),
            job("Beta", "Analyst", "Austin"),
            job("Acme", "Engineer", "Denver"),
        ];
        let (unique, removed) = deduplicate(jobs);
        assert_eq!(names(&unique), vec![("Acme", "Engineer"), ("Beta", "Analyst")]);
        assert_eq!(unique[0].location, "Boston");
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_key_ignores_case_and_surrounding_whitespace() {
        let jobs = vec![
            job("Okta", "Senior IAM Engineer", ""),
            job(" okta", "senior iam engineer ", "SF"),
        ];
        let (unique, removed) = deduplicate(jobs);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].company, "Okta");
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_same_company_different_title_kept() {
        let jobs = vec![job("Acme", "Engineer", ""), job("Acme", "Architect", "")];
        let (unique, removed) = deduplicate(jobs);
        assert_eq!(unique.len(), 2);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_empty_input() {
        let (unique, removed) = deduplicate(Vec::new());
        assert!(unique.is_empty());
        assert_eq!(removed, 0);
    }

    proptest! {
        #[test]
        fn deduplicate_is_idempotent(
            pairs in prop::collection::vec(("[AaBb ]{1,3}", "[XxYy ]{1,3}"), 0..20)
        ) {
            let jobs: Vec<_> = pairs.iter().map(|(c, t)| job(c, t, "")).collect();
            let (once, _) = deduplicate(jobs);
            let (twice, removed) = deduplicate(once.clone());
            prop_assert_eq!(removed, 0);
            prop_assert_eq!(twice, once);
        }
    }
}
