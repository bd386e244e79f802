use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use crate::builder::{BuildOptions, DEFAULT_DESCRIPTION_LIMIT};
use crate::models::OutputSchema;
use crate::rules::Rules;
use crate::sources::{country_name, COUNTRIES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdzunaCredentials {
    pub app_id: String,
    pub app_key: String,
}

/// Command-line and environment settings for a pipeline run.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Adzuna application id
    #[arg(long, env = "ADZUNA_APP_ID", hide_env_values = true)]
    pub adzuna_app_id: Option<String>,

    /// Adzuna application key
    #[arg(long, env = "ADZUNA_APP_KEY", hide_env_values = true)]
    pub adzuna_app_key: Option<String>,

    /// Token for GitHub issue search (raises the rate limit)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Skip GitHub issue search
    #[arg(long)]
    pub no_github: bool,

    /// Skip the curated sample postings
    #[arg(long)]
    pub no_samples: bool,

    /// Adzuna country codes to search (defaults to all supported)
    #[arg(long, value_delimiter = ',')]
    pub countries: Vec<String>,

    /// Pause between successive calls to the same API, in milliseconds
    #[arg(long, env = "JOBMAP_REQUEST_DELAY_MS", default_value_t = 1000)]
    pub request_delay_ms: u64,

    /// Where to write the jobs file
    #[arg(short, long, env = "JOBMAP_OUTPUT", default_value = "data/jobs.json")]
    pub output: PathBuf,

    /// JSON rules file replacing the built-in keyword tables
    #[arg(long, env = "JOBMAP_RULES")]
    pub rules: Option<PathBuf>,

    /// Maximum description length in characters
    #[arg(long, env = "JOBMAP_DESCRIPTION_LIMIT", default_value_t = DEFAULT_DESCRIPTION_LIMIT)]
    pub description_limit: usize,

    /// Output field set
    #[arg(long, env = "JOBMAP_SCHEMA", value_enum, default_value_t = OutputSchema::Visa)]
    pub schema: OutputSchema,

    /// Run the pipeline and print the report without writing the jobs file
    #[arg(long)]
    pub dry_run: bool,
}

/// Resolved configuration, built once and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub adzuna: Option<AdzunaCredentials>,
    pub github_token: Option<String>,
    pub include_github: bool,
    pub include_samples: bool,
    pub countries: Vec<String>,
    pub request_delay: Duration,
    pub output: PathBuf,
    pub rules_path: Option<PathBuf>,
    pub build: BuildOptions,
    pub schema: OutputSchema,
    pub dry_run: bool,
}

impl Config {
    pub fn from_args(args: RunArgs) -> Result<Self> {
        let adzuna = match (non_blank(args.adzuna_app_id), non_blank(args.adzuna_app_key)) {
            (Some(app_id), Some(app_key)) => Some(AdzunaCredentials { app_id, app_key }),
            (None, None) => None,
            _ => bail!("ADZUNA_APP_ID and ADZUNA_APP_KEY must be set together"),
        };

        let countries: Vec<String> = if args.countries.is_empty() {
            COUNTRIES.iter().map(|(code, _)| code.to_string()).collect()
        } else {
            args.countries
                .iter()
                .map(|c| c.trim().to_ascii_lowercase())
                .filter(|c| !c.is_empty())
                .collect()
        };
        if let Some(unknown) = countries.iter().find(|c| country_name(c).is_none()) {
            bail!("Unsupported country code '{}'", unknown);
        }

        if args.description_limit == 0 {
            bail!("Description limit must be at least 1 character");
        }

        Ok(Self {
            adzuna,
            github_token: non_blank(args.github_token),
            include_github: !args.no_github,
            include_samples: !args.no_samples,
            countries,
            request_delay: Duration::from_millis(args.request_delay_ms),
            output: args.output,
            rules_path: args.rules,
            build: BuildOptions {
                description_limit: args.description_limit,
            },
            schema: args.schema,
            dry_run: args.dry_run,
        })
    }

    /// The configured rule tables, or the built-in ones.
    pub fn rules(&self) -> Result<Rules> {
        load_rules(self.rules_path.as_deref())
    }
}

pub fn load_rules(path: Option<&std::path::Path>) -> Result<Rules> {
    match path {
        Some(path) => Rules::load(path),
        None => Ok(Rules::default()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
