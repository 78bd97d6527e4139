use sqlx::PgConnection;
use uuid::Uuid;

use crate::pkg::internal::adaptors::jobs::spec::JobEntry;
use crate::pkg::server::handlers::admin::{CreateJobInput, PatchJobInput};
use crate::prelude::Result;

const RETURNING: &str = "RETURNING job_id, title, company, location, job_type, \
     experience_level, remote, salary_min, salary_max, description, source, posted_at, updated_at";

pub struct JobMutator<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        JobMutator { conn }
    }

    pub async fn create(&mut self, job: CreateJobInput) -> Result<JobEntry> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            r#"
            INSERT INTO jobs (job_id, title, company, location, job_type, experience_level,
                              remote, salary_min, salary_max, description, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            {}
            "#,
            RETURNING
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(job.job_type)
        .bind(job.experience_level)
        .bind(job.remote)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.description)
        .bind(&job.source)
        .fetch_one(&mut *self.conn)
        .await?;
        Ok(row)
    }

    /// Inserts a batch of jobs on the mutator's connection; run inside one
    /// transaction so a failing row rolls back the whole batch.
    pub async fn create_many(&mut self, jobs: Vec<CreateJobInput>) -> Result<usize> {
        let mut inserted = 0usize;
        for job in jobs {
            self.create(job).await?;
            inserted += 1;
        }
        Ok(inserted)
    }

    pub async fn update(&mut self, job_id: &str, job: PatchJobInput) -> Result<Option<JobEntry>> {
        let mut query = String::from("UPDATE jobs SET updated_at = CURRENT_TIMESTAMP");
        let mut param_count = 1;

        if job.title.is_some() {
            param_count += 1;
            query.push_str(&format!(", title = ${}", param_count));
        }
        if job.company.is_some() {
            param_count += 1;
            query.push_str(&format!(", company = ${}", param_count));
        }
        if job.location.is_some() {
            param_count += 1;
            query.push_str(&format!(", location = ${}", param_count));
        }
        if job.job_type.is_some() {
            param_count += 1;
            query.push_str(&format!(", job_type = ${}", param_count));
        }
        if job.experience_level.is_some() {
            param_count += 1;
            query.push_str(&format!(", experience_level = ${}", param_count));
        }
        if job.remote.is_some() {
            param_count += 1;
            query.push_str(&format!(", remote = ${}", param_count));
        }
        if job.salary_min.is_some() {
            param_count += 1;
            query.push_str(&format!(", salary_min = ${}", param_count));
        }
        if job.salary_max.is_some() {
            param_count += 1;
            query.push_str(&format!(", salary_max = ${}", param_count));
        }
        if job.description.is_some() {
            param_count += 1;
            query.push_str(&format!(", description = ${}", param_count));
        }
        if job.source.is_some() {
            param_count += 1;
            query.push_str(&format!(", source = ${}", param_count));
        }

        query.push_str(&format!(" WHERE job_id = $1 {}", RETURNING));

        let mut q = sqlx::query_as::<_, JobEntry>(&query).bind(job_id);

        if let Some(title) = job.title {
            q = q.bind(title);
        }
        if let Some(company) = job.company {
            q = q.bind(company);
        }
        if let Some(location) = job.location {
            q = q.bind(location);
        }
        if let Some(job_type) = job.job_type {
            q = q.bind(job_type);
        }
        if let Some(level) = job.experience_level {
            q = q.bind(level);
        }
        if let Some(remote) = job.remote {
            q = q.bind(remote);
        }
        if let Some(min) = job.salary_min {
            q = q.bind(min);
        }
        if let Some(max) = job.salary_max {
            q = q.bind(max);
        }
        if let Some(description) = job.description {
            q = q.bind(description);
        }
        if let Some(source) = job.source {
            q = q.bind(source);
        }
        let row = q.fetch_optional(&mut *self.conn).await?;
        Ok(row)
    }

    pub async fn delete(&mut self, job_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE job_id = $1")
            .bind(job_id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
