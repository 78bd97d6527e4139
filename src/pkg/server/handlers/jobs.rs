use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use standard_error::{Interpolate, StandardError, Status};

use crate::{
    conf::settings,
    pkg::{
        internal::{
            adaptors::jobs::{selectors::JobSelector, spec::JobEntry},
            pagination::Paginator,
            search::{filter_jobs, JobFilters},
        },
        server::state::AppState,
    },
    prelude::Result,
};

#[derive(Deserialize)]
pub struct JobsQuery {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    /// comma-separated, e.g. `job_type=Full-time,Contract`
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub remote: Option<bool>,
    #[serde(default = "default_page")]
    pub page: usize,
    pub per_page: Option<usize>,
}

fn default_page() -> usize {
    1
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_list<T: std::str::FromStr>(value: Option<&str>) -> Vec<T> {
    // unknown labels are dropped rather than failing the search
    value
        .unwrap_or("")
        .split(',')
        .filter_map(|item| item.trim().parse().ok())
        .collect()
}

impl From<&JobsQuery> for JobFilters {
    fn from(query: &JobsQuery) -> Self {
        JobFilters {
            keyword: non_empty(query.keyword.clone()),
            location: non_empty(query.location.clone()),
            salary_min: query.salary_min,
            salary_max: query.salary_max,
            job_type: parse_list(query.job_type.as_deref()),
            experience_level: parse_list(query.experience_level.as_deref()),
            remote: query.remote,
        }
    }
}

#[derive(Serialize)]
pub struct JobsPage {
    pub jobs: Vec<JobEntry>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<Json<JobsPage>> {
    let filters = JobFilters::from(&query);
    let per_page = query.per_page.unwrap_or(settings.page_size).clamp(1, 100);

    let mut conn = state.db_pool.acquire().await?;
    let all_jobs = JobSelector::new(&mut conn).get_all().await?;
    let matching = filter_jobs(&all_jobs, &filters);

    let mut paginator = Paginator::new(matching.len(), per_page);
    // out-of-range pages fall back to page 1 rather than erroring
    paginator.navigate(query.page);
    let jobs = paginator.page_slice(&matching).to_vec();
    tracing::debug!(
        "serving page {} of {} ({} of {} jobs match)",
        paginator.current_page(),
        paginator.total_pages(),
        matching.len(),
        all_jobs.len()
    );

    Ok(Json(JobsPage {
        jobs,
        page: paginator.current_page(),
        per_page,
        total: matching.len(),
        total_pages: paginator.total_pages(),
    }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobEntry>> {
    let mut conn = state.db_pool.acquire().await?;
    match JobSelector::new(&mut conn).get_by_id(&job_id).await? {
        Some(job) => Ok(Json(job)),
        None => Err(StandardError::new("ERR-JOBS-001")
            .code(StatusCode::NOT_FOUND)
            .interpolate_err(job_id)),
    }
}
