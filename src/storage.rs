use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::models::{JobRecord, JobsFile, OutputSchema};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JobsFileView<'a> {
    last_update: &'a str,
    jobs: Vec<JobRecord<'a>>,
}

/// Serialize the jobs file in the requested schema.
pub fn to_json(file: &JobsFile, schema: OutputSchema) -> Result<String> {
    let view = JobsFileView {
        last_update: &file.last_update,
        jobs: file.jobs.iter().map(|job| JobRecord::new(job, schema)).collect(),
    };
    serde_json::to_string_pretty(&view).context("Failed to serialize jobs")
}

/// Write the jobs file, replacing any previous one. The content goes to a
/// sibling temp file first so readers never see a partial document.
pub fn write_jobs(path: &Path, file: &JobsFile, schema: OutputSchema) -> Result<()> {
    let json = to_json(file, schema)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    fs::write(tmp_path, json)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    fs::rename(tmp_path, path)
        .with_context(|| format!("Failed to move jobs file into place: {}", path.display()))?;

    tracing::info!(path = %path.display(), jobs = file.jobs.len(), "Wrote jobs file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanonicalJob, Clearance, JobType, Level, LocationType, VisaSponsorship};
    use serde_json::Value;

    fn sample_file() -> JobsFile {
        JobsFile {
            last_update: "2024-06-01T12:00:00.000000Z".to_string(),
            jobs: vec![CanonicalJob {
                company: "Okta".to_string(),
                title: "Senior IAM Engineer".to_string(),
                location: "Remote".to_string(),
                location_type: LocationType::Remote,
                job_type: JobType::Iam,
                level: Level::Senior,
                clearance: Clearance::None,
                visa_sponsorship: VisaSponsorship::Available,
                work_auth_required: false,
                location_restrictions: Default::default(),
                posted: "2024-05-01".to_string(),
                url: "#".to_string(),
                description: "remote, will sponsor visas".to_string(),
            }],
        }
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("jobs.json");

        write_jobs(&path, &sample_file(), OutputSchema::Visa).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["lastUpdate"], "2024-06-01T12:00:00.000000Z");
        assert_eq!(value["jobs"][0]["type"], "iam");
        assert_eq!(value["jobs"][0]["visaSponsorship"], "available");
        assert!(!dir.path().join("data").join("jobs.json.tmp").exists());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        fs::write(&path, "stale").unwrap();

        let mut file = sample_file();
        file.jobs.clear();
        write_jobs(&path, &file, OutputSchema::Visa).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["jobs"], Value::Array(Vec::new()));
    }

    #[test]
    fn test_basic_schema_omits_visa_fields() {
        let json = to_json(&sample_file(), OutputSchema::Basic).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let job = value["jobs"][0].as_object().unwrap();
        assert!(!job.contains_key("visaSponsorship"));
        assert!(!job.contains_key("locationRestrictions"));
        assert_eq!(job["level"], "senior");
    }

    #[test]
    fn test_written_file_reads_back_as_jobs_file() {
        let json = to_json(&sample_file(), OutputSchema::Visa).unwrap();
        let parsed: JobsFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.jobs, sample_file().jobs);
    }
}
