use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use standard_error::{Interpolate, StandardError, Status};

use crate::{
    pkg::{
        internal::{
            adaptors::jobs::selectors::JobSelector,
            auth::User,
            saved::{PgSavedStore, SavedJobs, ToggleOutcome},
        },
        server::state::AppState,
    },
    prelude::Result,
};

async fn tracker_for(state: &AppState, user: &User) -> Result<SavedJobs<PgSavedStore>> {
    let store = PgSavedStore::new(state.db_pool.clone());
    let mut saved = SavedJobs::with_identity(store, &user.user_id);
    saved.load().await?;
    Ok(saved)
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Json<Value>> {
    let saved = tracker_for(&state, &user).await?;
    let mut job_ids: Vec<&String> = saved.ids().iter().collect();
    job_ids.sort();
    Ok(Json(json!({ "job_ids": job_ids })))
}

pub async fn toggle(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    if JobSelector::new(&mut conn).get_by_id(&job_id).await?.is_none() {
        return Err(StandardError::new("ERR-JOBS-001")
            .code(StatusCode::NOT_FOUND)
            .interpolate_err(job_id));
    }
    drop(conn);

    let mut saved = tracker_for(&state, &user).await?;
    let status = match saved.toggle(&job_id).await? {
        ToggleOutcome::Added => "added",
        ToggleOutcome::Removed => "removed",
        ToggleOutcome::AuthRequired => {
            return Err(StandardError::new("ERR-AUTH-001").code(StatusCode::UNAUTHORIZED));
        }
    };
    tracing::info!("{} {} job {}", &user.email, status, &job_id);
    Ok(Json(
        json!({ "job_id": job_id, "status": status, "saved": saved.is_saved(&job_id) }),
    ))
}
