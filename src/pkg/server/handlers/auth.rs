use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    Extension, Json,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};
use standard_error::{Interpolate, StandardError, Status};
use validator::Validate;

use crate::{
    pkg::{
        internal::auth::{AuthToken, TokenStatus, User},
        server::state::AppState,
    },
    prelude::Result,
};

#[derive(Deserialize, Validate)]
pub struct SignupInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub name: String,
}

#[derive(Deserialize, Validate)]
pub struct VerifyInput {
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Deserialize, Validate)]
pub struct ProfileInput {
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub name: String,
}

fn validated<T: Validate>(input: T) -> Result<T> {
    input.validate().map_err(|e| {
        StandardError::new("ERR-VALID-001")
            .code(StatusCode::BAD_REQUEST)
            .interpolate_err(e.to_string())
    })?;
    Ok(input)
}

pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupInput>,
) -> Result<(HeaderMap, Json<Value>)> {
    let input = validated(input)?;
    let user = AuthToken::issue_user_token(&state, &input.email, &input.name).await?;
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&format!("_Host_rj_email={}; Path=/", &user.email))?,
    );
    Ok((headers, Json(json!({"detail": "verification code sent"}))))
}

pub async fn verify(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(input): Json<VerifyInput>,
) -> Result<(HeaderMap, Json<Value>)> {
    let input = validated(input)?;
    let jar = CookieJar::from_headers(&headers);
    let mut headers = HeaderMap::new();
    let Some(email) = jar.get("_Host_rj_email").filter(|c| !c.value().is_empty()) else {
        return Err(StandardError::new("ERR-AUTH-005").code(StatusCode::BAD_REQUEST));
    };
    let Some(user) = User::retrieve(&state, email.value()).await? else {
        return Err(StandardError::new("ERR-AUTH-005").code(StatusCode::BAD_REQUEST));
    };
    let token = AuthToken::pending_for_user(&state, &user.user_id).await?;
    tracing::debug!("verifying pending token for {}", &user.email);
    let Some(token) = token else {
        user.issue_token(&state).await?;
        return Ok((
            headers,
            Json(json!({"detail": "no active code found, sent a new one"})),
        ));
    };
    if token.expiry < chrono::Utc::now() {
        AuthToken::transition(
            &state,
            &user.user_id,
            TokenStatus::Pending,
            TokenStatus::Expired,
        )
        .await?;
        user.issue_token(&state).await?;
        return Ok((
            headers,
            Json(json!({"detail": "code expired, sent a new one"})),
        ));
    }
    if input.code != token.code {
        tracing::warn!(
            "rejecting {:?} code {} for {}",
            &token.status,
            &token.token,
            &user.email
        );
        AuthToken::transition(
            &state,
            &user.user_id,
            TokenStatus::Pending,
            TokenStatus::Rejected,
        )
        .await?;
        return Err(StandardError::new("ERR-AUTH-003").code(StatusCode::UNAUTHORIZED));
    }
    AuthToken::transition(
        &state,
        &user.user_id,
        TokenStatus::Pending,
        TokenStatus::Verified,
    )
    .await?;
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&format!("_Host_rj_token={}; Path=/", &token.token))?,
    );
    tracing::info!("{} signed in", &user.email);
    Ok((headers, Json(json!({"detail": "verification successful"}))))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
) -> Result<Json<Value>> {
    AuthToken::transition(
        &state,
        &user.user_id,
        TokenStatus::Verified,
        TokenStatus::Expired,
    )
    .await?;
    tracing::info!("{} logged out", &user.email);
    Ok(Json(json!({"detail": "logged out"})))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    Json(input): Json<ProfileInput>,
) -> Result<Json<User>> {
    let input = validated(input)?;
    let updated = user.rename(&state, &input.name).await?;
    Ok(Json(updated))
}
