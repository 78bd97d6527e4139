use std::collections::HashSet;

use sqlx::PgConnection;

use crate::prelude::Result;

pub struct SavedSelector<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> SavedSelector<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        SavedSelector { conn }
    }

    pub async fn ids_for_user(&mut self, user_id: &str) -> Result<HashSet<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT job_id FROM saved_jobs WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&mut *self.conn)
                .await?;
        Ok(rows.into_iter().map(|(job_id,)| job_id).collect())
    }
}
