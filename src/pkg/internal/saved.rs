use std::collections::HashSet;
use std::sync::Arc;

use sqlx::PgPool;

use crate::pkg::internal::adaptors::saved::{mutators::SavedMutator, selectors::SavedSelector};
use crate::prelude::Result;

/// Persistence seam for the saved-job set. The database owns the truth;
/// the tracker below only caches it.
#[allow(async_fn_in_trait)]
pub trait SavedStore {
    async fn fetch_ids(&self, user_id: &str) -> Result<HashSet<String>>;
    async fn insert(&self, user_id: &str, job_id: &str) -> Result<()>;
    async fn remove(&self, user_id: &str, job_id: &str) -> Result<()>;
}

pub struct PgSavedStore {
    pool: Arc<PgPool>,
}

impl PgSavedStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        PgSavedStore { pool }
    }
}

impl SavedStore for PgSavedStore {
    async fn fetch_ids(&self, user_id: &str) -> Result<HashSet<String>> {
        let mut conn = self.pool.acquire().await?;
        SavedSelector::new(&mut conn).ids_for_user(user_id).await
    }

    async fn insert(&self, user_id: &str, job_id: &str) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        SavedMutator::new(&mut conn).insert(user_id, job_id).await
    }

    async fn remove(&self, user_id: &str, job_id: &str) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        SavedMutator::new(&mut conn)
            .delete(user_id, job_id)
            .await
            .map(|_| ())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    AuthRequired,
}

/// Tracks which jobs the current user has bookmarked. The local set is a
/// cache of the store, replaced wholesale on every (re)load and cleared the
/// moment the identity goes away. Each load carries a generation number so
/// a fetch that completes after the identity has already changed is thrown
/// away instead of clobbering the newer state.
pub struct SavedJobs<S: SavedStore> {
    store: S,
    user_id: Option<String>,
    ids: HashSet<String>,
    generation: u64,
}

impl<S: SavedStore> SavedJobs<S> {
    pub fn new(store: S) -> Self {
        SavedJobs {
            store,
            user_id: None,
            ids: HashSet::new(),
            generation: 0,
        }
    }

    pub fn with_identity(store: S, user_id: &str) -> Self {
        let mut saved = Self::new(store);
        saved.set_identity(Some(user_id));
        saved
    }

    /// Login, logout, or account switch. The cached set is dropped
    /// immediately so nothing leaks across identities.
    pub fn set_identity(&mut self, user_id: Option<&str>) {
        self.generation += 1;
        self.user_id = user_id.map(str::to_string);
        self.ids.clear();
    }

    pub fn is_saved(&self, job_id: &str) -> bool {
        self.ids.contains(job_id)
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }

    /// Marks the start of a reload; pair with [`apply_load`](Self::apply_load).
    pub fn begin_load(&self) -> u64 {
        self.generation
    }

    /// Installs a fetched set unless the identity changed while the fetch
    /// was in flight, in which case the result is stale and dropped.
    pub fn apply_load(&mut self, generation: u64, ids: HashSet<String>) -> bool {
        if generation != self.generation {
            tracing::debug!("discarding stale saved-jobs load");
            return false;
        }
        self.ids = ids;
        true
    }

    pub async fn load(&mut self) -> Result<()> {
        let Some(user_id) = self.user_id.clone() else {
            return Ok(());
        };
        let generation = self.begin_load();
        let ids = self.store.fetch_ids(&user_id).await?;
        self.apply_load(generation, ids);
        Ok(())
    }

    /// Flips membership of `job_id`, remote store first. On a store failure
    /// the local set stays at its previous value and the error bubbles up;
    /// nothing retries.
    pub async fn toggle(&mut self, job_id: &str) -> Result<ToggleOutcome> {
        let Some(user_id) = self.user_id.clone() else {
            return Ok(ToggleOutcome::AuthRequired);
        };
        if self.ids.contains(job_id) {
            self.store.remove(&user_id, job_id).await?;
            self.ids.remove(job_id);
            Ok(ToggleOutcome::Removed)
        } else {
            self.store.insert(&user_id, job_id).await?;
            self.ids.insert(job_id.to_string());
            Ok(ToggleOutcome::Added)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use standard_error::StandardError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use tracing_test::traced_test;

    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<HashSet<(String, String)>>,
        failing: AtomicBool,
    }

    impl MemoryStore {
        fn fail_next_calls(&self, fail: bool) {
            self.failing.store(fail, Ordering::SeqCst);
        }

        fn check(&self) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                Err(StandardError::new("ERR-DB-000"))
            } else {
                Ok(())
            }
        }
    }

    impl SavedStore for &MemoryStore {
        async fn fetch_ids(&self, user_id: &str) -> Result<HashSet<String>> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|(user, _)| user == user_id)
                .map(|(_, job)| job.clone())
                .collect())
        }

        async fn insert(&self, user_id: &str, job_id: &str) -> Result<()> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            rows.insert((user_id.to_string(), job_id.to_string()));
            Ok(())
        }

        async fn remove(&self, user_id: &str, job_id: &str) -> Result<()> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            rows.remove(&(user_id.to_string(), job_id.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_toggle_without_identity_requires_auth() -> Result<()> {
        let store = MemoryStore::default();
        let mut saved = SavedJobs::new(&store);
        assert_eq!(saved.toggle("job-1").await?, ToggleOutcome::AuthRequired);
        assert!(saved.ids().is_empty());
        assert!(store.rows.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_adds_then_removes() -> Result<()> {
        let store = MemoryStore::default();
        let mut saved = SavedJobs::with_identity(&store, "u1");
        assert_eq!(saved.toggle("job-1").await?, ToggleOutcome::Added);
        assert!(saved.is_saved("job-1"));
        assert_eq!(saved.toggle("job-1").await?, ToggleOutcome::Removed);
        assert!(!saved.is_saved("job-1"));
        assert!(store.rows.lock().unwrap().is_empty());
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    async fn test_store_failure_leaves_local_set_unchanged() -> Result<()> {
        let store = MemoryStore::default();
        let mut saved = SavedJobs::with_identity(&store, "u1");
        saved.toggle("job-1").await?;

        store.fail_next_calls(true);
        assert!(saved.toggle("job-1").await.is_err());
        assert!(saved.is_saved("job-1"));
        assert!(saved.toggle("job-2").await.is_err());
        assert!(!saved.is_saved("job-2"));

        store.fail_next_calls(false);
        assert_eq!(saved.toggle("job-1").await?, ToggleOutcome::Removed);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_replaces_set_wholesale() -> Result<()> {
        let store = MemoryStore::default();
        {
            let mut seeded = SavedJobs::with_identity(&store, "u1");
            seeded.toggle("job-1").await?;
            seeded.toggle("job-2").await?;
        }
        let mut saved = SavedJobs::with_identity(&store, "u1");
        saved.load().await?;
        assert_eq!(saved.ids().len(), 2);
        assert!(saved.is_saved("job-1") && saved.is_saved("job-2"));
        Ok(())
    }

    #[tokio::test]
    async fn test_identity_change_clears_immediately() -> Result<()> {
        let store = MemoryStore::default();
        let mut saved = SavedJobs::with_identity(&store, "u1");
        saved.toggle("job-1").await?;

        saved.set_identity(None);
        assert!(saved.ids().is_empty());
        assert_eq!(saved.toggle("job-2").await?, ToggleOutcome::AuthRequired);
        Ok(())
    }

    #[traced_test]
    #[tokio::test]
    async fn test_stale_load_is_discarded() -> Result<()> {
        let store = MemoryStore::default();
        let mut saved = SavedJobs::with_identity(&store, "u1");

        let stale = saved.begin_load();
        let response = (&store).fetch_ids("u1").await?;
        saved.set_identity(Some("u2"));

        assert!(!saved.apply_load(stale, response));
        let fresh = saved.begin_load();
        assert!(saved.apply_load(fresh, HashSet::new()));
        Ok(())
    }
}
