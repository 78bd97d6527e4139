use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, patch, post};
use axum::Router;

use super::handlers;
use super::handlers::auth::{logout, profile, signup, verify};
use super::handlers::probes::{healthz, livez};
use super::middlewares::{authn, authz};
use super::state::AppState;
use crate::prelude::Result;

pub async fn build_routes() -> Result<Router> {
    let state = AppState::new().await?;

    let admin = Router::new()
        .route("/admin/jobs", post(handlers::admin::create_job))
        .route("/admin/jobs/import", post(handlers::admin::import_jobs))
        .route("/admin/jobs/export", get(handlers::admin::export_jobs))
        .route("/admin/jobs/:job_id", patch(handlers::admin::update_job))
        .route("/admin/jobs/:job_id", delete(handlers::admin::delete_job))
        .route("/admin/users", get(handlers::admin::list_users))
        .layer(from_fn(authz::require_admin));

    let app = Router::new()
        .merge(admin)
        .route("/saved", get(handlers::saved::list))
        .route("/saved/:job_id", post(handlers::saved::toggle))
        .route("/profile", patch(profile))
        .route("/logout", post(logout))
        .layer(from_fn_with_state(state.clone(), authn::authenticate))
        .route("/jobs", get(handlers::jobs::list))
        .route("/jobs/:job_id", get(handlers::jobs::get))
        .route("/signup", post(signup))
        .route("/verify", post(verify))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .with_state(state);

    Ok(app)
}
