use anyhow::{anyhow, Context, Result};
use regex::Regex;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

use super::{non_empty, SourceCollector};
use crate::models::RawPosting;

const GITHUB_SEARCH_URL: &str = "https://api.github.com/search/issues";
const SEARCH_QUERY: &str = "IAM engineer OR security engineer in:title in:body is:open";
const FALLBACK_COMPANY: &str = "Via GitHub";

/// Hiring announcements posted as GitHub issues.
pub struct GithubCollector {
    client: Client,
    token: Option<String>,
}

impl GithubCollector {
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("jobmap/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, token })
    }
}

impl SourceCollector for GithubCollector {
    fn name(&self) -> &str {
        "github"
    }

    fn collect(&self) -> Result<Vec<RawPosting>> {
        let mut request = self.client.get(GITHUB_SEARCH_URL).query(&[
            ("q", SEARCH_QUERY),
            ("sort", "created"),
            ("per_page", "30"),
        ]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .context("Failed to send request to GitHub search")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "GitHub search failed with status {}",
                response.status()
            ));
        }

        let body: Value = response
            .json()
            .context("Failed to parse GitHub search response")?;

        parse_search_response(&body)
    }
}

/// Keep issues that look like job posts and map them to raw postings.
pub fn parse_search_response(body: &Value) -> Result<Vec<RawPosting>> {
    let Some(items) = body.get("items").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let tag_prefix = Regex::new(r"^\s*(\[[^\]]*\]\s*)+")?;
    let mut postings = Vec::new();

    for item in items {
        let Some(raw_title) = item.get("title").and_then(Value::as_str) else {
            continue;
        };
        let lower = raw_title.to_lowercase();
        if !lower.contains("hiring") && !lower.contains("job") {
            continue;
        }

        let stripped = tag_prefix.replace(raw_title, "");
        let (title, company) = parse_title_at_company(&stripped);

        postings.push(RawPosting {
            company: Some(company.unwrap_or_else(|| FALLBACK_COMPANY.to_string())),
            title: Some(title),
            location: Some("Remote".to_string()),
            description: item.get("body").and_then(Value::as_str).map(str::to_string),
            posted: non_empty(item.get("created_at").and_then(Value::as_str)),
            url: non_empty(item.get("html_url").and_then(Value::as_str)),
            source: Some("github".to_string()),
            region: None,
        });
    }

    Ok(postings)
}

/// Split "Title at Company" into its parts. Anything after the company in
/// parentheses, a pipe or a spaced dash is dropped.
fn parse_title_at_company(text: &str) -> (String, Option<String>) {
    let text = text.trim();

    if let Some(idx) = text.to_ascii_lowercase().find(" at ") {
        let title = text[..idx].trim();
        let rest = &text[idx + 4..];
        let end = [rest.find('('), rest.find('|'), rest.find(" - ")]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(rest.len());
        let company = rest[..end].trim();
        if !title.is_empty() && !company.is_empty() {
            return (title.to_string(), Some(company.to_string()));
        }
    }

    (text.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_title_at_company() {
        let (title, company) = parse_title_at_company("Senior IAM Engineer at Acme Corp (Remote)");
        assert_eq!(title, "Senior IAM Engineer");
        assert_eq!(company, Some("Acme Corp".to_string()));

        let (title, company) = parse_title_at_company("Security Engineer at Beta | Full-time");
        assert_eq!(title, "Security Engineer");
        assert_eq!(company, Some("Beta".to_string()));

        let (title, company) = parse_title_at_company("Hiring: Security Engineer");
        assert_eq!(title, "Hiring: Security Engineer");
        assert_eq!(company, None);
    }

    #[test]
    fn test_parse_search_response_filters_and_maps() {
        let body = json!({
            "items": [
                {
                    "title": "[Hiring] IAM Engineer at Gamma (Remote)",
                    "body": "Okta and SailPoint experience. Will sponsor.",
                    "created_at": "2024-04-02T08:00:00Z",
                    "html_url": "https://github.com/org/repo/issues/1"
                },
                {
                    "title": "Fix security engineer docs typo",
                    "created_at": "2024-04-03T08:00:00Z"
                },
                {
                    "title": "Job: Security Engineer",
                    "created_at": "2024-04-04T08:00:00Z",
                    "html_url": "https://github.com/org/repo/issues/3"
                },
                { "body": "no title" }
            ]
        });

        let postings = parse_search_response(&body).unwrap();
        assert_eq!(postings.len(), 2);

        assert_eq!(postings[0].title.as_deref(), Some("IAM Engineer"));
        assert_eq!(postings[0].company.as_deref(), Some("Gamma"));
        assert_eq!(postings[0].location.as_deref(), Some("Remote"));
        assert_eq!(postings[0].posted.as_deref(), Some("2024-04-02T08:00:00Z"));

        assert_eq!(postings[1].title.as_deref(), Some("Job: Security Engineer"));
        assert_eq!(postings[1].company.as_deref(), Some("Via GitHub"));
        assert_eq!(postings[1].description, None);
    }

    #[test]
    fn test_parse_search_response_without_items() {
        let body = json!({ "message": "API rate limit exceeded" });
        assert!(parse_search_response(&body).unwrap().is_empty());
    }

    #[test]
    #[ignore] // requires network
    fn test_live_search() {
        let collector = GithubCollector::new(None).unwrap();
        assert!(collector.collect().is_ok());
    }
}
