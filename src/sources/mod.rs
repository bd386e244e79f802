//! Source collectors: anything that can hand the pipeline a batch of raw postings.

pub mod adzuna;
pub mod github;
pub mod sample;

use anyhow::Result;
use chrono::NaiveDate;
use scraper::Html;

use crate::config::Config;
use crate::models::RawPosting;

pub use adzuna::AdzunaCollector;
pub use github::GithubCollector;
pub use sample::SampleCollector;

/// A job board, API or fixture supplying raw postings.
///
/// An `Err` is treated exactly like an empty batch by the pipeline.
pub trait SourceCollector {
    fn name(&self) -> &str;
    fn collect(&self) -> Result<Vec<RawPosting>>;
}

/// Adapts a plain closure to the collector contract.
pub struct FnCollector<F> {
    name: String,
    fetch: F,
}

impl<F> FnCollector<F>
where
    F: Fn() -> Vec<RawPosting>,
{
    pub fn new(name: &str, fetch: F) -> Self {
        Self {
            name: name.to_string(),
            fetch,
        }
    }
}

impl<F> SourceCollector for FnCollector<F>
where
    F: Fn() -> Vec<RawPosting>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn collect(&self) -> Result<Vec<RawPosting>> {
        Ok((self.fetch)())
    }
}

/// Collectors enabled by `config`, in the order their results take precedence.
pub fn configured(config: &Config, today: NaiveDate) -> Result<Vec<Box<dyn SourceCollector>>> {
    let mut collectors: Vec<Box<dyn SourceCollector>> = Vec::new();

    if let Some(credentials) = &config.adzuna {
        collectors.push(Box::new(AdzunaCollector::new(
            credentials.clone(),
            &config.countries,
            config.request_delay,
        )?));
    } else {
        tracing::info!("Adzuna credentials not configured, skipping");
    }

    if config.include_github {
        collectors.push(Box::new(GithubCollector::new(config.github_token.clone())?));
    }

    if config.include_samples {
        collectors.push(Box::new(SampleCollector::new(today)));
    }

    Ok(collectors)
}

/// Adzuna country codes and their display names.
pub const COUNTRIES: &[(&str, &str)] = &[
    ("us", "United States"),
    ("gb", "United Kingdom"),
    ("ca", "Canada"),
    ("au", "Australia"),
    ("de", "Germany"),
    ("fr", "France"),
    ("nl", "Netherlands"),
    ("nz", "New Zealand"),
    ("pl", "Poland"),
    ("at", "Austria"),
    ("ch", "Switzerland"),
    ("in", "India"),
    ("sg", "Singapore"),
    ("za", "South Africa"),
    ("br", "Brazil"),
    ("mx", "Mexico"),
    ("it", "Italy"),
    ("es", "Spain"),
];

pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Flatten an HTML fragment to plain text with single spaces.
pub fn clean_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
