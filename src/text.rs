/// Case-folded views of a posting used for keyword matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// `lower(title) + " " + lower(description)`
    pub combined: String,
    pub title_lower: String,
}

impl NormalizedText {
    pub fn new(title: &str, description: &str) -> Self {
        let title_lower = title.to_lowercase();
        let combined = format!("{} {}", title_lower, description.to_lowercase());
        Self {
            combined,
            title_lower,
        }
    }

    /// Empty inputs produce a combined view that is only the joining space.
    pub fn is_empty(&self) -> bool {
        self.combined.trim().is_empty()
    }
}

/// True if `haystack` contains any of `keywords`. Keywords are expected lower-case.
pub fn contains_any<S: AsRef<str>>(haystack: &str, keywords: &[S]) -> bool {
    keywords
        .iter()
        .any(|keyword| haystack.contains(keyword.as_ref()))
}
