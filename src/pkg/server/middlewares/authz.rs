use std::sync::Arc;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
    Extension,
};
use standard_error::{StandardError, Status};

use crate::{pkg::internal::auth::User, prelude::Result};

// Runs inside the authenticate layer, so the user extension is always set.
pub async fn require_admin(
    Extension(user): Extension<Arc<User>>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if !user.is_admin {
        tracing::warn!("{} attempted an admin route", &user.email);
        return Err(StandardError::new("ERR-AUTH-004").code(StatusCode::FORBIDDEN));
    }
    Ok(next.run(request).await)
}
