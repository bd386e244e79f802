use crate::models::{VisaAssessment, VisaSponsorship};
use crate::rules::VisaRules;
use crate::text::{contains_any, NormalizedText};

/// Detect sponsorship posture, work-authorization requirement and location
/// restrictions from title and description.
pub fn detect(rules: &VisaRules, title: &str, description: &str) -> VisaAssessment {
    detect_text(rules, &NormalizedText::new(title, description))
}

pub fn detect_text(rules: &VisaRules, text: &NormalizedText) -> VisaAssessment {
    let combined = text.combined.as_str();

    let mut sponsorship = VisaSponsorship::Unknown;
    if contains_any(combined, &rules.positive) {
        sponsorship = VisaSponsorship::Available;
    }
    // Checked unconditionally: a negative phrase overrides any positive one.
    if contains_any(combined, &rules.negative) {
        sponsorship = VisaSponsorship::NotAvailable;
    }

    let work_auth_required = contains_any(combined, &rules.work_authorization);

    let restrictions = rules
        .restrictions
        .iter()
        .filter(|group| group.matches(combined))
        .map(|group| group.category)
        .collect();

    VisaAssessment {
        sponsorship,
        work_auth_required,
        restrictions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocationRestriction;
    use proptest::prelude::*;

    fn run(title: &str, description: &str) -> VisaAssessment {
        detect(&VisaRules::default(), title, description)
    }

    #[test]
    fn test_empty_input_yields_defaults() {
        let visa = run("", "");
        assert_eq!(visa.sponsorship, VisaSponsorship::Unknown);
        assert!(!visa.work_auth_required);
        assert!(visa.restrictions.is_empty());
    }

    #[test]
    fn test_positive_phrase() {
        let visa = run("IAM Engineer", "We offer H1B sponsorship and will sponsor visas");
        assert_eq!(visa.sponsorship, VisaSponsorship::Available);
        let visa = run("IAM Engineer", "Relocation assistance provided");
        assert_eq!(visa.sponsorship, VisaSponsorship::Available);
    }

    #[test]
    fn test_negative_overrides_positive() {
        let visa = run(
            "IAM Engineer",
            "Visa sponsorship available. Security clearance required.",
        );
        assert_eq!(visa.sponsorship, VisaSponsorship::NotAvailable);

        let visa = run("Engineer", "relocation assistance; US citizens only");
        assert_eq!(visa.sponsorship, VisaSponsorship::NotAvailable);
    }

    #[test]
    fn test_negative_alone() {
        let visa = run("Engineer", "We cannot sponsor at this time");
        assert_eq!(visa.sponsorship, VisaSponsorship::NotAvailable);
    }

    #[test]
    fn test_work_auth_is_independent_of_status() {
        let visa = run("Engineer", "Candidates must have the right to work in the UK");
        assert!(visa.work_auth_required);
        assert_eq!(visa.sponsorship, VisaSponsorship::Unknown);

        // "must be authorized to work" is also a negative sponsorship phrase
        let visa = run("Engineer", "Must be authorized to work in the US");
        assert!(visa.work_auth_required);
        assert_eq!(visa.sponsorship, VisaSponsorship::NotAvailable);
    }

    #[test]
    fn test_restrictions_accumulate() {
        let visa = run(
            "Cleared IAM Engineer",
            "U.S. citizens only. Active TS/SCI. Must reside in Virginia. US remote only.",
        );
        let expected: Vec<_> = vec![
            LocationRestriction::UsCitizensOnly,
            LocationRestriction::ClearanceRequired,
            LocationRestriction::LocalCandidatesPreferred,
            LocationRestriction::DomesticRemoteOnly,
        ];
        assert_eq!(visa.restrictions.into_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_single_restriction() {
        let visa = run("Engineer", "secret clearance preferred");
        assert_eq!(visa.restrictions.len(), 1);
        assert!(visa.restrictions.contains(&LocationRestriction::ClearanceRequired));
    }

    #[test]
    fn test_title_participates() {
        let visa = run("Engineer - Visa Sponsorship", "");
        assert_eq!(visa.sponsorship, VisaSponsorship::Available);
    }

    proptest! {
        #[test]
        fn detect_is_deterministic(title in ".{0,60}", description in ".{0,200}") {
            let rules = VisaRules::default();
            prop_assert_eq!(
                detect(&rules, &title, &description),
                detect(&rules, &title, &description)
            );
        }

        #[test]
        fn negative_always_wins(
            positive in prop::sample::select(VisaRules::default().positive),
            negative in prop::sample::select(VisaRules::default().negative),
            filler in "[a-z ]{0,30}",
        ) {
            let rules = VisaRules::default();
            let description = format!("{positive} {filler} {negative}");
            prop_assert_eq!(
                detect(&rules, "", &description).sponsorship,
                VisaSponsorship::NotAvailable
            );
        }
    }
}
