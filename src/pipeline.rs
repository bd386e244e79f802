//! Collect → classify → build → deduplicate → sort → summarize.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use tracing::{debug, info, warn};

use crate::builder::{self, BuildOptions, SkipReason};
use crate::classify::classify_text;
use crate::dedup::deduplicate;
use crate::models::{CanonicalJob, JobsFile, RawPosting};
use crate::rules::Rules;
use crate::sources::SourceCollector;
use crate::summary::Summary;
use crate::text::NormalizedText;
use crate::visa::detect_text;

/// A raw posting that did not make it into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub source: String,
    /// Position within the source's batch.
    pub index: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Records returned per source, in invocation order.
    pub per_source: Vec<(String, usize)>,
    pub failed_sources: Vec<String>,
    pub collected: usize,
    pub skipped: Vec<SkippedRecord>,
    pub duplicates: usize,
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub file: JobsFile,
    pub summary: Summary,
    pub report: BatchReport,
}

pub struct Pipeline<'a> {
    rules: &'a Rules,
    options: BuildOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(rules: &'a Rules, options: BuildOptions) -> Self {
        Self { rules, options }
    }

    /// Run every collector in order and produce the artifact as of `now`.
    /// Never fails: failed sources and unusable records are reported, not raised.
    pub fn run(&self, collectors: &[Box<dyn SourceCollector>], now: DateTime<Utc>) -> RunOutput {
        let today = now.date_naive();
        let mut report = BatchReport::default();
        let mut built = Vec::new();

        for collector in collectors {
            let name = collector.name().to_string();
            let postings = match collector.collect() {
                Ok(postings) => postings,
                Err(e) => {
                    warn!(source = %name, "Source failed, contributing no records: {:#}", e);
                    report.failed_sources.push(name.clone());
                    Vec::new()
                }
            };
            info!(source = %name, count = postings.len(), "Collected postings");
            report.per_source.push((name.clone(), postings.len()));
            report.collected += postings.len();

            for (index, raw) in postings.iter().enumerate() {
                match self.process(raw, today) {
                    Ok(job) => built.push(job),
                    Err(reason) => {
                        warn!(source = %name, index, "Skipping record: {}", reason);
                        report.skipped.push(SkippedRecord {
                            source: name.clone(),
                            index,
                            reason,
                        });
                    }
                }
            }
        }

        let (mut jobs, duplicates) = deduplicate(built);
        report.duplicates = duplicates;
        sort_by_posted_desc(&mut jobs);

        info!(
            collected = report.collected,
            skipped = report.skipped.len(),
            duplicates,
            retained = jobs.len(),
            "Pipeline complete"
        );

        let summary = Summary::from_jobs(&jobs);
        RunOutput {
            file: JobsFile {
                last_update: format_timestamp(now),
                jobs,
            },
            summary,
            report,
        }
    }

    /// Classify a single raw posting and assemble its canonical record.
    pub fn process(&self, raw: &RawPosting, today: NaiveDate) -> Result<CanonicalJob, SkipReason> {
        let text = NormalizedText::new(
            raw.title.as_deref().unwrap_or(""),
            raw.description.as_deref().unwrap_or(""),
        );
        if text.is_empty() {
            debug!(source = ?raw.source, "No title or description, using default attributes");
        }
        let attributes = classify_text(self.rules, &text);
        let visa = detect_text(&self.rules.visa, &text);

        let job = builder::build(raw, attributes, visa, &self.options, today)?;
        debug!(
            company = %job.company,
            title = %job.title,
            job_type = %job.job_type,
            level = %job.level,
            "Classified posting"
        );
        Ok(job)
    }
}

/// Newest first by plain string comparison of `posted`; correct only for
/// `YYYY-MM-DD` values. Ties keep their relative order.
pub fn sort_by_posted_desc(jobs: &mut [CanonicalJob]) {
    jobs.sort_by(|a, b| b.posted.cmp(&a.posted));
}

/// ISO-8601 UTC timestamp with a `Z` marker.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}
