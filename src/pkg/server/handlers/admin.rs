use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use standard_error::{Interpolate, StandardError, Status};
use validator::Validate;

use crate::{
    pkg::{
        internal::{
            adaptors::jobs::{
                mutators::JobMutator,
                selectors::JobSelector,
                spec::{ExperienceLevel, JobEntry, JobType},
            },
            auth::User,
            csv,
        },
        server::state::{AppState, GetTxn},
    },
    prelude::Result,
};

fn default_source() -> String {
    "manual".to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobInput {
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub company: String,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub location: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub remote: bool,
    #[validate(range(min = 0))]
    pub salary_min: Option<i32>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i32>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_source")]
    pub source: String,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct PatchJobInput {
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub company: Option<String>,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub remote: Option<bool>,
    #[validate(range(min = 0))]
    pub salary_min: Option<i32>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i32>,
    pub description: Option<String>,
    pub source: Option<String>,
}

fn check_input<T: Validate>(input: &T, salary_min: Option<i32>, salary_max: Option<i32>) -> Result<()> {
    input.validate().map_err(|e| {
        StandardError::new("ERR-VALID-001")
            .code(StatusCode::BAD_REQUEST)
            .interpolate_err(e.to_string())
    })?;
    if let (Some(min), Some(max)) = (salary_min, salary_max) {
        if min > max {
            return Err(StandardError::new("ERR-VALID-001")
                .code(StatusCode::BAD_REQUEST)
                .interpolate_err("salary_min must not exceed salary_max".to_string()));
        }
    }
    Ok(())
}

pub async fn create_job(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Json(input): Json<CreateJobInput>,
) -> Result<Json<JobEntry>> {
    check_input(&input, input.salary_min, input.salary_max)?;
    let mut tx = state.db_pool.begin_txn().await?;
    let job = JobMutator::new(&mut tx).create(input).await?;
    tx.commit().await?;
    tracing::info!("{} created job {} ({})", &user.email, &job.title, &job.job_id);
    Ok(Json(job))
}

pub async fn update_job(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Path(job_id): Path<String>,
    Json(input): Json<PatchJobInput>,
) -> Result<Json<JobEntry>> {
    check_input(&input, input.salary_min, input.salary_max)?;
    let mut tx = state.db_pool.begin_txn().await?;
    let updated = JobMutator::new(&mut tx).update(&job_id, input).await?;
    tx.commit().await?;
    match updated {
        Some(job) => {
            tracing::info!("{} updated job {}", &user.email, &job.job_id);
            Ok(Json(job))
        }
        None => Err(StandardError::new("ERR-JOBS-001")
            .code(StatusCode::NOT_FOUND)
            .interpolate_err(job_id)),
    }
}

pub async fn delete_job(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let deleted = JobMutator::new(&mut tx).delete(&job_id).await?;
    tx.commit().await?;
    if !deleted {
        return Err(StandardError::new("ERR-JOBS-001")
            .code(StatusCode::NOT_FOUND)
            .interpolate_err(job_id));
    }
    tracing::info!("{} deleted job {}", &user.email, &job_id);
    Ok(Json(json!({ "job_id": job_id, "status": "deleted" })))
}

/// Bulk upload: the whole file is parsed and validated before the first
/// insert, and all rows land in one transaction.
pub async fn import_jobs(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    body: String,
) -> Result<Json<Value>> {
    let inputs = csv::parse(&body)?;
    for input in &inputs {
        check_input(input, input.salary_min, input.salary_max)?;
    }
    let mut tx = state.db_pool.begin_txn().await?;
    let imported = JobMutator::new(&mut tx).create_many(inputs).await?;
    tx.commit().await?;
    tracing::info!("{} imported {} jobs from csv", &user.email, imported);
    Ok(Json(json!({ "imported": imported })))
}

pub async fn export_jobs(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<(HeaderMap, String)> {
    let mut conn = state.db_pool.acquire().await?;
    let jobs = JobSelector::new(&mut conn).get_all().await?;
    let body = csv::export(&jobs);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!(
            "attachment; filename=\"job-listings-{}.csv\"",
            chrono::Utc::now().format("%Y-%m-%d")
        ))?,
    );
    tracing::info!("{} exported {} jobs", &user.email, jobs.len());
    Ok((headers, body))
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(_user): Extension<Arc<User>>,
) -> Result<Json<Vec<User>>> {
    Ok(Json(User::list(&state).await?))
}
