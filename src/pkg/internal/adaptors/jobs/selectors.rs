use sqlx::PgConnection;

use crate::{pkg::internal::adaptors::jobs::spec::JobEntry, prelude::Result};

const JOB_COLUMNS: &str = "job_id, title, company, location, job_type, experience_level, \
     remote, salary_min, salary_max, description, source, posted_at, updated_at";

pub struct JobSelector<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> JobSelector<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        JobSelector { conn }
    }

    pub async fn get_by_id(&mut self, job_id: &str) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {} FROM jobs WHERE job_id = $1",
            JOB_COLUMNS
        ))
        .bind(job_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row)
    }

    // Newest listings first; the filter engine preserves this order downstream.
    pub async fn get_all(&mut self) -> Result<Vec<JobEntry>> {
        let rows = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {} FROM jobs ORDER BY posted_at DESC",
            JOB_COLUMNS
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows)
    }
}
