use std::collections::HashMap;

use standard_error::{Interpolate, StandardError};

use crate::pkg::internal::adaptors::jobs::spec::{ExperienceLevel, JobEntry, JobType};
use crate::pkg::server::handlers::admin::CreateJobInput;
use crate::prelude::Result;

const REQUIRED_FIELDS: [&str; 4] = ["title", "company", "location", "job_type"];
const EXPORT_HEADERS: [&str; 6] = ["id", "title", "company", "location", "job_type", "posted_at"];

/// Parses a bulk-upload CSV into job inputs. The header row names the
/// columns; a missing required column rejects the whole file before any row
/// is looked at. Fields are split on plain commas — quoting is not honored
/// on import, matching what the upload template produces.
pub fn parse(text: &str) -> Result<Vec<CreateJobInput>> {
    let mut lines = text.lines();
    let headers: Vec<String> = lines
        .next()
        .unwrap_or("")
        .split(',')
        .map(|header| header.trim().to_lowercase())
        .collect();

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !headers.iter().any(|h| h == *field))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(StandardError::new("ERR-CSV-001").interpolate_err(missing.join(", ")));
    }

    let mut jobs = Vec::new();
    for (line_no, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let values: Vec<&str> = line.split(',').map(str::trim).collect();
        let row: HashMap<&str, &str> = headers
            .iter()
            .zip(values.iter())
            .map(|(header, value)| (header.as_str(), *value))
            .collect();
        // header row is line 1
        jobs.push(parse_row(&row, line_no + 2)?);
    }
    Ok(jobs)
}

fn parse_row(row: &HashMap<&str, &str>, line_no: usize) -> Result<CreateJobInput> {
    let field = |name: &str| row.get(name).copied().unwrap_or("").to_string();

    for name in REQUIRED_FIELDS {
        if field(name).is_empty() {
            return Err(StandardError::new("ERR-CSV-002")
                .interpolate_err(format!("line {}: missing {}", line_no, name)));
        }
    }

    let job_type: JobType = field("job_type").parse().map_err(|_| {
        StandardError::new("ERR-CSV-002").interpolate_err(format!(
            "line {}: unknown job_type '{}'",
            line_no,
            field("job_type")
        ))
    })?;
    // unlabeled listings land in the entry bucket, same as the add-job form
    let experience_level = field("experience_level")
        .parse()
        .unwrap_or(ExperienceLevel::Entry);
    let remote = matches!(
        field("remote").to_lowercase().as_str(),
        "true" | "yes" | "1"
    );

    Ok(CreateJobInput {
        title: field("title"),
        company: field("company"),
        location: field("location"),
        job_type,
        experience_level,
        remote,
        salary_min: field("salary_min").parse().ok(),
        salary_max: field("salary_max").parse().ok(),
        description: field("description"),
        source: "csv".to_string(),
    })
}

/// Renders the listing export the admin dashboard downloads.
pub fn export(jobs: &[JobEntry]) -> String {
    let mut out = EXPORT_HEADERS.join(",");
    for job in jobs {
        out.push('\n');
        out.push_str(
            &[
                escape(&job.job_id),
                escape(&job.title),
                escape(&job.company),
                escape(&job.location),
                job.job_type.to_string(),
                job.posted_at.to_rfc3339(),
            ]
            .join(","),
        );
    }
    out
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_parse_builds_jobs_from_rows() -> Result<()> {
        let text = "title,company,location,job_type,experience_level,remote,salary_min,salary_max\n\
                    Backend Engineer,Acme,Bengaluru,Full-time,Senior,true,90000,140000\n\
                    \n\
                    Design Intern,Riser,Pune,Internship,,,,";
        let jobs = parse(text)?;
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "Backend Engineer");
        assert_eq!(jobs[0].job_type, JobType::FullTime);
        assert_eq!(jobs[0].experience_level, ExperienceLevel::Senior);
        assert!(jobs[0].remote);
        assert_eq!(jobs[0].salary_min, Some(90_000));
        assert_eq!(jobs[1].job_type, JobType::Internship);
        assert_eq!(jobs[1].experience_level, ExperienceLevel::Entry);
        assert_eq!(jobs[1].salary_min, None);
        assert_eq!(jobs[1].source, "csv");
        Ok(())
    }

    #[test]
    fn test_parse_rejects_missing_required_header() {
        let text = "title,location,job_type\nBackend Engineer,Bengaluru,Full-time";
        let err = parse(text).unwrap_err();
        assert_eq!(err.err_code, "ERR-CSV-001");
    }

    #[test]
    fn test_parse_rejects_unknown_job_type() {
        let text = "title,company,location,job_type\nBackend Engineer,Acme,Bengaluru,Gig";
        let err = parse(text).unwrap_err();
        assert_eq!(err.err_code, "ERR-CSV-002");
    }

    #[test]
    fn test_export_quotes_fields_with_commas() {
        let job = JobEntry {
            job_id: "j1".to_string(),
            title: "Engineer, Backend".to_string(),
            company: "Acme".to_string(),
            location: "Bengaluru, India".to_string(),
            job_type: JobType::Contract,
            experience_level: ExperienceLevel::Mid,
            remote: false,
            salary_min: None,
            salary_max: None,
            description: "".to_string(),
            source: "manual".to_string(),
            posted_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let out = export(std::slice::from_ref(&job));
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("id,title,company,location,job_type,posted_at"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("j1,\"Engineer, Backend\",Acme,\"Bengaluru, India\",Contract,"));
    }
}
