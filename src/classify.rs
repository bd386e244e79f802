use crate::models::Attributes;
use crate::rules::{first_match, Rules};
use crate::text::NormalizedText;

/// Derive job type, level, clearance and location mode from a posting's text.
///
/// Type and level look at the title only; clearance and location mode look at
/// title and description together. Never fails: unmatched axes take their default.
pub fn classify(rules: &Rules, title: &str, description: &str) -> Attributes {
    classify_text(rules, &NormalizedText::new(title, description))
}

pub fn classify_text(rules: &Rules, text: &NormalizedText) -> Attributes {
    Attributes {
        job_type: first_match(&rules.job_type, &text.title_lower).unwrap_or_default(),
        level: first_match(&rules.level, &text.title_lower).unwrap_or_default(),
        clearance: first_match(&rules.clearance, &text.combined).unwrap_or_default(),
        location_type: first_match(&rules.location_type, &text.combined).unwrap_or_default(),
    }
}
