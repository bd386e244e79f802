use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use super::{clean_text, country_name, non_empty, SourceCollector};
use crate::config::AdzunaCredentials;
use crate::models::RawPosting;

const ADZUNA_API_URL: &str = "https://api.adzuna.com/v1/api/jobs";

/// Markets searched first, with a broader query and more results.
pub const PRIORITY_COUNTRIES: &[&str] = &["us", "gb", "ca", "de", "in", "au", "sg"];

const PRIORITY_QUERY: &str = "IAM OR identity OR cybersecurity";
const PRIORITY_RESULTS: u32 = 30;
const DEFAULT_QUERY: &str = "IAM OR security";
const DEFAULT_RESULTS: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountrySearch {
    pub country: String,
    pub query: &'static str,
    pub max_results: u32,
}

/// Order searches so priority markets come first, then the rest as configured.
pub fn search_plan(countries: &[String]) -> Vec<CountrySearch> {
    let (priority, other): (Vec<&String>, Vec<&String>) = countries
        .iter()
        .partition(|c| PRIORITY_COUNTRIES.contains(&c.as_str()));

    let mut ordered: Vec<&String> = Vec::new();
    for code in PRIORITY_COUNTRIES {
        ordered.extend(priority.iter().copied().filter(|c| c.as_str() == *code));
    }
    ordered.extend(other);

    ordered
        .into_iter()
        .map(|country| {
            let is_priority = PRIORITY_COUNTRIES.contains(&country.as_str());
            CountrySearch {
                country: country.clone(),
                query: if is_priority { PRIORITY_QUERY } else { DEFAULT_QUERY },
                max_results: if is_priority {
                    PRIORITY_RESULTS
                } else {
                    DEFAULT_RESULTS
                },
            }
        })
        .collect()
}

pub struct AdzunaCollector {
    client: Client,
    credentials: AdzunaCredentials,
    plan: Vec<CountrySearch>,
    delay: Duration,
}

impl AdzunaCollector {
    pub fn new(credentials: AdzunaCredentials, countries: &[String], delay: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            credentials,
            plan: search_plan(countries),
            delay,
        })
    }

    fn search(&self, search: &CountrySearch) -> Result<Vec<RawPosting>> {
        let url = format!("{}/{}/search/1", ADZUNA_API_URL, search.country);
        let max_results = search.max_results.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("app_id", self.credentials.app_id.as_str()),
                ("app_key", self.credentials.app_key.as_str()),
                ("results_per_page", max_results.as_str()),
                ("what", search.query),
                ("content-type", "application/json"),
                ("sort_by", "date"),
            ])
            .send()
            .with_context(|| format!("Failed to reach Adzuna for '{}'", search.country))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Adzuna request for '{}' failed with status {}",
                search.country,
                response.status()
            ));
        }

        let body: Value = response
            .json()
            .context("Failed to parse Adzuna response")?;

        Ok(parse_search_response(&search.country, &body))
    }
}

impl SourceCollector for AdzunaCollector {
    fn name(&self) -> &str {
        "adzuna"
    }

    fn collect(&self) -> Result<Vec<RawPosting>> {
        let mut postings = Vec::new();
        let mut failures = 0;

        for (i, search) in self.plan.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                thread::sleep(self.delay);
            }

            match self.search(search) {
                Ok(found) => {
                    info!(country = %search.country, count = found.len(), "Adzuna search complete");
                    postings.extend(found);
                }
                Err(e) => {
                    failures += 1;
                    warn!(country = %search.country, "Adzuna search failed: {:#}", e);
                }
            }
        }

        if failures > 0 && failures == self.plan.len() {
            return Err(anyhow!("all {} Adzuna searches failed", failures));
        }

        Ok(postings)
    }
}

/// Map an Adzuna search response to raw postings. Unreadable entries map to
/// empty postings so the pipeline can count them as skipped.
pub fn parse_search_response(country_code: &str, body: &Value) -> Vec<RawPosting> {
    let Some(results) = body.get("results").and_then(Value::as_array) else {
        return Vec::new();
    };

    let country = country_name(country_code).unwrap_or("Unknown");

    results
        .iter()
        .map(|result| {
            if !result.is_object() {
                return RawPosting {
                    source: Some("adzuna".to_string()),
                    ..Default::default()
                };
            }

            let str_at = |pointer: &str| result.pointer(pointer).and_then(Value::as_str);

            let city = non_empty(str_at("/location/display_name"))
                .or_else(|| non_empty(str_at("/location/area/0")));
            let location = match city {
                Some(city) if city != country => format!("{}, {}", city, country),
                _ => country.to_string(),
            };

            RawPosting {
                company: non_empty(str_at("/company/display_name")),
                title: str_at("/title").map(clean_text).filter(|t| !t.is_empty()),
                location: Some(location),
                description: str_at("/description").map(clean_text),
                posted: non_empty(str_at("/created")),
                url: non_empty(str_at("/redirect_url")),
                source: Some("adzuna".to_string()),
                region: Some(country.to_string()),
            }
        })
        .collect()
}
