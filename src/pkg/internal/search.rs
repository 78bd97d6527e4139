use crate::pkg::internal::adaptors::jobs::spec::{ExperienceLevel, JobEntry, JobType};

/// Criteria a user applies to narrow the job list. Every field is optional;
/// an absent field places no constraint on that dimension. Rebuilt from the
/// request on every search, never persisted.
#[derive(Debug, Default, Clone)]
pub struct JobFilters {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub job_type: Vec<JobType>,
    pub experience_level: Vec<ExperienceLevel>,
    pub remote: Option<bool>,
}

impl JobFilters {
    /// Predicates are AND-combined and checked cheapest-miss-first, bailing
    /// on the first one that fails.
    pub fn matches(&self, job: &JobEntry) -> bool {
        if let Some(keyword) = &self.keyword {
            let keyword = keyword.to_lowercase();
            if !job.title.to_lowercase().contains(&keyword)
                && !job.company.to_lowercase().contains(&keyword)
                && !job.description.to_lowercase().contains(&keyword)
            {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !job.location.to_lowercase().contains(&location.to_lowercase()) {
                return false;
            }
        }
        if !self.job_type.is_empty() && !self.job_type.contains(&job.job_type) {
            return false;
        }
        if !self.experience_level.is_empty()
            && !self.experience_level.contains(&job.experience_level)
        {
            return false;
        }
        // A job with an unknown salary ceiling is never excluded by a minimum
        // bound, and vice versa. Business rule, not an accident.
        if let Some(min) = self.salary_min {
            if job.salary_max.is_some_and(|max| max < min) {
                return false;
            }
        }
        if let Some(max) = self.salary_max {
            if job.salary_min.is_some_and(|job_min| job_min > max) {
                return false;
            }
        }
        if self.remote.unwrap_or(false) && !job.remote {
            return false;
        }
        true
    }
}

/// Stable filter over the full list: keeps the input order, fabricates
/// nothing, and recomputes from scratch on every call. An empty result
/// means "no matches", not an error.
pub fn filter_jobs(jobs: &[JobEntry], filters: &JobFilters) -> Vec<JobEntry> {
    jobs.iter().filter(|job| filters.matches(job)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job(job_id: &str, title: &str, company: &str) -> JobEntry {
        JobEntry {
            job_id: job_id.to_string(),
            title: title.to_string(),
            company: company.to_string(),
            location: "Bengaluru, India".to_string(),
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::Mid,
            remote: false,
            salary_min: None,
            salary_max: None,
            description: "".to_string(),
            source: "manual".to_string(),
            posted_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ids(jobs: &[JobEntry]) -> Vec<&str> {
        jobs.iter().map(|j| j.job_id.as_str()).collect()
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let jobs = vec![job("a", "Backend Engineer", "Acme"), job("b", "Designer", "Riser")];
        let filtered = filter_jobs(&jobs, &JobFilters::default());
        assert_eq!(filtered, jobs);
    }

    #[test]
    fn test_result_is_ordered_subsequence() {
        let jobs = vec![
            job("a", "Rust Engineer", "Acme"),
            job("b", "Designer", "Riser"),
            job("c", "Senior Rust Engineer", "Umbrella"),
        ];
        let filters = JobFilters {
            keyword: Some("rust".to_string()),
            ..Default::default()
        };
        let filtered = filter_jobs(&jobs, &filters);
        assert_eq!(ids(&filtered), vec!["a", "c"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let jobs = vec![
            job("a", "Rust Engineer", "Acme"),
            job("b", "Designer", "Riser"),
        ];
        let filters = JobFilters {
            keyword: Some("engineer".to_string()),
            ..Default::default()
        };
        let once = filter_jobs(&jobs, &filters);
        let twice = filter_jobs(&once, &filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_keyword_matches_any_of_title_company_description() {
        let mut by_description = job("c", "Engineer", "Acme");
        by_description.description = "We use Haskell in production".to_string();
        let jobs = vec![
            job("a", "Haskell Developer", "Acme"),
            job("b", "Engineer", "Haskell Heads"),
            by_description,
            job("d", "Engineer", "Acme"),
        ];
        let filters = JobFilters {
            keyword: Some("HASKELL".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &filters)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_location_substring_case_insensitive() {
        let mut remote_job = job("b", "Engineer", "Acme");
        remote_job.location = "Pune, India".to_string();
        let jobs = vec![job("a", "Engineer", "Acme"), remote_job];
        let filters = JobFilters {
            location: Some("bengaluru".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &filters)), vec!["a"]);
    }

    #[test]
    fn test_job_type_and_remote_combined() {
        let mut on_site = job("a", "Engineer", "Acme");
        on_site.job_type = JobType::FullTime;
        let mut remote = job("b", "Engineer", "Riser");
        remote.job_type = JobType::FullTime;
        remote.remote = true;
        let jobs = vec![remote.clone(), on_site];
        let filters = JobFilters {
            job_type: vec![JobType::FullTime],
            remote: Some(true),
            ..Default::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &filters)), vec!["b"]);
    }

    #[test]
    fn test_experience_level_membership() {
        let mut senior = job("a", "Engineer", "Acme");
        senior.experience_level = ExperienceLevel::Senior;
        let mut entry = job("b", "Engineer", "Riser");
        entry.experience_level = ExperienceLevel::Entry;
        let jobs = vec![senior, entry];
        let filters = JobFilters {
            experience_level: vec![ExperienceLevel::Senior, ExperienceLevel::Mid],
            ..Default::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &filters)), vec!["a"]);
    }

    #[test]
    fn test_salary_min_keeps_jobs_with_unknown_max() {
        let mut below = job("a", "Engineer", "Acme");
        below.salary_max = Some(90_000);
        let unknown = job("b", "Engineer", "Riser");
        let mut above = job("c", "Engineer", "Umbrella");
        above.salary_max = Some(140_000);
        let jobs = vec![below, unknown, above];
        let filters = JobFilters {
            salary_min: Some(100_000),
            ..Default::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &filters)), vec!["b", "c"]);
    }

    #[test]
    fn test_salary_max_keeps_jobs_with_unknown_min() {
        let mut too_expensive = job("a", "Engineer", "Acme");
        too_expensive.salary_min = Some(150_000);
        let unknown = job("b", "Engineer", "Riser");
        let mut in_range = job("c", "Engineer", "Umbrella");
        in_range.salary_min = Some(80_000);
        let jobs = vec![too_expensive, unknown, in_range];
        let filters = JobFilters {
            salary_max: Some(120_000),
            ..Default::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &filters)), vec!["b", "c"]);
    }

    #[test]
    fn test_remote_false_places_no_constraint() {
        let mut remote = job("a", "Engineer", "Acme");
        remote.remote = true;
        let jobs = vec![remote, job("b", "Engineer", "Riser")];
        let filters = JobFilters {
            remote: Some(false),
            ..Default::default()
        };
        assert_eq!(filter_jobs(&jobs, &filters).len(), 2);
    }

    #[test]
    fn test_everything_excluded_is_empty_not_error() {
        let jobs = vec![job("a", "Engineer", "Acme")];
        let filters = JobFilters {
            keyword: Some("astronaut".to_string()),
            ..Default::default()
        };
        assert!(filter_jobs(&jobs, &filters).is_empty());
        assert!(filter_jobs(&[], &filters).is_empty());
    }
}
