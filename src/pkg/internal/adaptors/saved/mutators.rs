use sqlx::PgConnection;

use crate::prelude::Result;

pub struct SavedMutator<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> SavedMutator<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        SavedMutator { conn }
    }

    // Saving twice is harmless; the pair is unique.
    pub async fn insert(&mut self, user_id: &str, job_id: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO saved_jobs (user_id, job_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(job_id)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }

    pub async fn delete(&mut self, user_id: &str, job_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
            .bind(user_id)
            .bind(job_id)
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
