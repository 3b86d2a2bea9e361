//! Credential store: password checks and the single active session per user.

use chrono::{Duration, Utc};
use rand::distr::{Alphanumeric, SampleString};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::models::User;
use crate::error::{AppError, AppResult, INVALID_CREDENTIALS};

const SESSION_TOKEN_LEN: usize = 64;

/// Verified against when the email is unknown.
const DUMMY_PASSWORD: &str = "postia-no-such-account";

const USER_COLUMNS: &str = "id, email, password_hash, full_name, role, \
    session_token_hash, session_expires_at, created_at";

/// bcrypt is CPU heavy, so it runs on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await?
        .map_err(|e| AppError::Internal(format!("bcrypt: {}", e)))
}

async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await?;
    // A malformed stored hash is treated as a mismatch.
    Ok(verified.unwrap_or(false))
}

fn generate_session_token() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), SESSION_TOKEN_LEN)
}

/// Only the digest of a session token is persisted.
fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
    session_ttl: Duration,
    bcrypt_cost: u32,
    dummy_hash: Arc<OnceCell<String>>,
}

impl UserStore {
    pub fn new(pool: SqlitePool, session_ttl_days: i64, bcrypt_cost: u32) -> Self {
        Self {
            pool,
            session_ttl: Duration::days(session_ttl_days.max(1)),
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Hash at the configured cost, computed on first use.
    async fn dummy_hash(&self) -> AppResult<String> {
        let cost = self.bcrypt_cost;
        self.dummy_hash
            .get_or_try_init(|| hash_password(DUMMY_PASSWORD.to_string(), cost))
            .await
            .cloned()
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Unknown email and wrong password produce the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.find_by_email(&email).await? else {
            // Unknown emails still pay for one bcrypt verification
            verify_password(password.to_string(), self.dummy_hash().await?).await?;
            tracing::info!("login rejected");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(password.to_string(), user.password_hash.clone()).await? {
            tracing::info!(user_id = user.id, "login rejected");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS));
        }

        Ok(user)
    }

    /// Issues a fresh token, replacing whatever session the user had before.
    pub async fn create_session(&self, user: &User) -> AppResult<String> {
        let token = generate_session_token();
        let expires_at = Utc::now() + self.session_ttl;

        sqlx::query(
            "UPDATE users SET session_token_hash = ?, session_expires_at = ? WHERE id = ?",
        )
        .bind(hash_session_token(&token))
        .bind(expires_at)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        tracing::info!(user_id = user.id, "session created");
        Ok(token)
    }

    /// Unknown, replaced or expired tokens all resolve to `None`.
    pub async fn resolve_session(&self, token: &str) -> AppResult<Option<User>> {
        if token.is_empty() {
            return Ok(None);
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE session_token_hash = ?",
            USER_COLUMNS
        ))
        .bind(hash_session_token(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.filter(|u| u.session_expires_at.is_some_and(|exp| exp > Utc::now())))
    }

    /// Drops the session the token belongs to. Returns whether one was found.
    pub async fn clear_session(&self, token: &str) -> AppResult<bool> {
        if token.is_empty() {
            return Ok(false);
        }

        let result = sqlx::query(
            r#"
            UPDATE users SET session_token_hash = NULL, session_expires_at = NULL
            WHERE session_token_hash = ?
            "#,
        )
        .bind(hash_session_token(token))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
