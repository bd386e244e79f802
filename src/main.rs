mod builder;
mod classify;
mod config;
mod dedup;
mod models;
mod pipeline;
mod rules;
mod sources;
mod storage;
mod summary;
mod telemetry;
mod text;
mod visa;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use config::{load_rules, Config, RunArgs};
use models::{Clearance, JobType, Level, LocationRestriction, LocationType, VisaSponsorship};
use pipeline::{Pipeline, RunOutput};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

const TOP_COUNTRIES: usize = 15;

#[derive(Parser)]
#[command(name = "jobmap")]
#[command(about = "Collect, classify and deduplicate IAM and security job postings")]
struct Cli {
    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long, global = true, env = "JOBMAP_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect postings from every configured source and write the jobs file
    Run(RunArgs),

    /// Classify a single posting and print the result as JSON
    Classify {
        /// Posting title
        title: String,

        /// Posting description
        #[arg(short, long, default_value = "")]
        description: String,

        /// JSON rules file replacing the built-in keyword tables
        #[arg(long, env = "JOBMAP_RULES")]
        rules: Option<PathBuf>,
    },

    /// Print the active keyword rules as JSON
    Rules {
        /// JSON rules file to validate and print instead of the built-in tables
        #[arg(long, env = "JOBMAP_RULES")]
        rules: Option<PathBuf>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Classification {
    #[serde(rename = "type")]
    job_type: JobType,
    level: Level,
    clearance: Clearance,
    location_type: LocationType,
    visa_sponsorship: VisaSponsorship,
    work_auth_required: bool,
    location_restrictions: BTreeSet<LocationRestriction>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;

    match cli.command {
        Commands::Run(args) => run(args)?,

        Commands::Classify {
            title,
            description,
            rules,
        } => {
            let rules = load_rules(rules.as_deref())?;
            let attributes = classify::classify(&rules, &title, &description);
            let visa = visa::detect(&rules.visa, &title, &description);
            let classification = Classification {
                job_type: attributes.job_type,
                level: attributes.level,
                clearance: attributes.clearance,
                location_type: attributes.location_type,
                visa_sponsorship: visa.sponsorship,
                work_auth_required: visa.work_auth_required,
                location_restrictions: visa.restrictions,
            };
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }

        Commands::Rules { rules } => {
            let rules = load_rules(rules.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
    }

    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    let config = Config::from_args(args)?;
    let rules = config.rules()?;
    let now = Utc::now();

    let collectors = sources::configured(&config, now.date_naive())
        .context("Failed to set up sources")?;
    if collectors.is_empty() {
        tracing::warn!("No sources enabled, the jobs file will be empty");
    }

    let output = Pipeline::new(&rules, config.build).run(&collectors, now);

    if config.dry_run {
        println!("(Dry run - {} was not written)", config.output.display());
    } else {
        storage::write_jobs(&config.output, &output.file, config.schema)?;
        println!(
            "Wrote {} jobs to {}",
            output.file.jobs.len(),
            config.output.display()
        );
    }

    print_report(&output);
    Ok(())
}

fn print_report(output: &RunOutput) {
    let report = &output.report;
    let summary = &output.summary;

    println!("\nResults:");
    for (source, count) in &report.per_source {
        println!("  {:<12} {:>6}", source, count);
    }
    println!("  Collected:   {:>6}", report.collected);
    println!("  Skipped:     {:>6}", report.skipped.len());
    println!("  Duplicates:  {:>6}", report.duplicates);
    println!("  Total jobs:  {:>6}", output.file.jobs.len());
    if !report.failed_sources.is_empty() {
        println!("  Failed:      {}", report.failed_sources.join(", "));
    }
    for skipped in &report.skipped {
        println!("  Skipped {} #{}: {}", skipped.source, skipped.index, skipped.reason);
    }

    if output.file.jobs.is_empty() {
        return;
    }

    println!("\n{:<16} {:>6}", "TYPE", "JOBS");
    println!("{}", "-".repeat(23));
    for (job_type, count) in &summary.by_type {
        println!("{:<16} {:>6}", job_type, count);
    }

    println!("\n{:<16} {:>6}", "LOCATION", "JOBS");
    println!("{}", "-".repeat(23));
    for (location_type, count) in &summary.by_location_type {
        println!("{:<16} {:>6}", location_type, count);
    }

    println!("\n{:<16} {:>6}", "VISA", "JOBS");
    println!("{}", "-".repeat(23));
    for (visa, count) in &summary.by_visa {
        println!("{:<16} {:>6}", visa, count);
    }

    println!("\n{:<30} {:>6}", "COUNTRY", "JOBS");
    println!("{}", "-".repeat(37));
    for (country, count) in summary.top_countries(TOP_COUNTRIES) {
        println!("{:<30} {:>6}", truncate(country, 30), count);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
