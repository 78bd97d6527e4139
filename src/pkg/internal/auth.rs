use crate::{
    conf::settings,
    pkg::{
        internal::email::{authtoken::AuthnCodeTemplate, SendEmail},
        server::state::AppState,
    },
    prelude::Result,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use sqlx::prelude::{FromRow, Type};
use standard_error::StandardError;
use uuid::Uuid;

#[derive(Debug, Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "token_status", rename_all = "lowercase")]
pub enum TokenStatus {
    Pending,
    Verified,
    Rejected,
    Expired,
}

#[derive(FromRow, Debug)]
pub struct AuthToken {
    pub token: Uuid,
    pub user_id: String,
    pub code: String,
    pub expiry: DateTime<Utc>,
    pub status: TokenStatus,
}

#[derive(FromRow, Debug, serde::Serialize, Clone)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
}

impl User {
    pub async fn create(state: &AppState, email: &str, name: &str) -> Result<Self> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, email, name, is_admin)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET name = $3
            RETURNING user_id, email, name, is_admin
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(email)
        .bind(name)
        .bind(email == settings.admin_email)
        .fetch_one(&*state.db_pool)
        .await?;
        Ok(user)
    }

    pub async fn retrieve(state: &AppState, email: &str) -> Result<Option<Self>> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT user_id, email, name, is_admin FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&*state.db_pool)
        .await?)
    }

    pub async fn list(state: &AppState) -> Result<Vec<Self>> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT user_id, email, name, is_admin FROM users ORDER BY email",
        )
        .fetch_all(&*state.db_pool)
        .await?)
    }

    pub async fn rename(&self, state: &AppState, name: &str) -> Result<Self> {
        Ok(sqlx::query_as::<_, User>(
            "UPDATE users SET name = $2 WHERE user_id = $1 RETURNING user_id, email, name, is_admin",
        )
        .bind(&self.user_id)
        .bind(name)
        .fetch_one(&*state.db_pool)
        .await?)
    }

    pub async fn issue_token(&self, state: &AppState) -> Result<()> {
        let code = AuthToken::generate_code();
        tracing::debug!("issued code for {}", &self.email);
        sqlx::query(
            r#"
            INSERT INTO tokens (user_id, code, expiry, status)
            VALUES ($1, $2, NOW() + interval '1 hour', $3)
            "#,
        )
        .bind(&self.user_id)
        .bind(&code)
        .bind(TokenStatus::Pending)
        .execute(&*state.db_pool)
        .await?;
        AuthnCodeTemplate {
            name: &self.name,
            code: &code,
        }
        .send(&self.email)?;
        Ok(())
    }
}

impl AuthToken {
    fn generate_code() -> String {
        let mut rng = rand::rng();
        (0..6).map(|_| rng.random_range(0..10).to_string()).collect()
    }

    pub async fn issue_user_token(state: &AppState, email: &str, name: &str) -> Result<User> {
        let user = User::create(state, email, name).await?;
        user.issue_token(state).await?;
        Ok(user)
    }

    pub async fn pending_for_user(state: &AppState, user_id: &str) -> Result<Option<Self>> {
        Ok(sqlx::query_as::<_, AuthToken>(
            r#"
            SELECT token, user_id, code, expiry, status FROM tokens
            WHERE user_id = $1 AND status = $2
            ORDER BY expiry DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(TokenStatus::Pending)
        .fetch_optional(&*state.db_pool)
        .await?)
    }

    pub async fn transition(
        state: &AppState,
        user_id: &str,
        from: TokenStatus,
        to: TokenStatus,
    ) -> Result<()> {
        sqlx::query("UPDATE tokens SET status = $3 WHERE user_id = $1 AND status = $2")
            .bind(user_id)
            .bind(from)
            .bind(to)
            .execute(&*state.db_pool)
            .await?;
        Ok(())
    }

    pub async fn check_token_validity(state: &AppState, token_str: &str) -> Result<User> {
        let token_str = token_str
            .parse::<Uuid>()
            .map_err(|_| StandardError::new("ERR-AUTH-002"))?;

        tracing::debug!("verifying token: {}", token_str);
        let result = sqlx::query_as::<_, AuthToken>(
            r#"
            SELECT token, user_id, code, expiry, status
            FROM tokens
            WHERE token = $1
            AND status = $2
            AND expiry > now()
            "#,
        )
        .bind(token_str)
        .bind(TokenStatus::Verified)
        .fetch_optional(&*state.db_pool)
        .await;
        if let Ok(Some(token)) = result {
            let user = sqlx::query_as::<_, User>(
                "SELECT user_id, email, name, is_admin FROM users WHERE user_id = $1",
            )
            .bind(&token.user_id)
            .fetch_one(&*state.db_pool)
            .await?;
            Ok(user)
        } else {
            Err(StandardError::new("ERR-AUTH-001"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AuthToken;

    #[test]
    fn test_generated_code_is_six_digits() {
        for _ in 0..32 {
            let code = AuthToken::generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
