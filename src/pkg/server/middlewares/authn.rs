use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use standard_error::{StandardError, Status};

use crate::{
    pkg::{
        internal::auth::{AuthToken, User},
        server::state::AppState,
    },
    prelude::Result,
};

pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let jar = CookieJar::from_headers(&headers);
    let maybe_cookie = jar.get("_Host_rj_token").filter(|c| !c.value().is_empty());
    if let Some(cookie) = maybe_cookie {
        if let Ok(user) = AuthToken::check_token_validity(&state, cookie.value()).await {
            request.extensions_mut().insert(Arc::new(user));
            return Ok(next.run(request).await);
        }
    }
    tracing::warn!("token missing, authentication denied");
    // Known email without a live token gets a fresh sign-in code instead of
    // a dead end; the 401 still tells the client to go verify.
    if let Some(email) = jar.get("_Host_rj_email").filter(|c| !c.value().is_empty()) {
        if let Some(user) = User::retrieve(&state, email.value()).await? {
            user.issue_token(&state).await?;
        }
    }
    Err(StandardError::new("ERR-AUTH-001").code(StatusCode::UNAUTHORIZED))
}
