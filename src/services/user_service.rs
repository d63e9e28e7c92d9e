use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{generate_jwt, Claims};
use crate::database::models::{User, UserProfile};
use crate::error::ApiError;

use super::conflict_on_unique;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new user and issue an identity token. The username unique
    /// index backstops the pre-check under concurrent registration.
    pub async fn register(&self, credentials: Credentials) -> Result<String, ApiError> {
        let (username, password) = validate_credentials(credentials)?;

        let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(&username)
            .fetch_one(&self.pool)
            .await?;
        if taken > 0 {
            return Err(ApiError::conflict("User already exists"));
        }

        let password_hash = hash_password(&password)?;
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&username)
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "User already exists"))?;

        tracing::info!("registered user {}", username);

        let token = generate_jwt(&Claims::new(id, username))?;
        Ok(token)
    }

    /// Authenticate and issue an identity token. Unknown username and wrong
    /// password produce the same generic error so usernames cannot be probed.
    pub async fn login(&self, credentials: Credentials) -> Result<String, ApiError> {
        let (username, password) = validate_credentials(credentials)?;

        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
            .bind(&username)
            .fetch_optional(&self.pool)
            .await?;

        let Some(user) = user else {
            return Err(ApiError::bad_request("Invalid credentials"));
        };

        if !verify_password(&password, &user.password_hash) {
            return Err(ApiError::bad_request("Invalid credentials"));
        }

        let token = generate_jwt(&Claims::new(user.id, user.username))?;
        Ok(token)
    }

    /// Fetch the authenticated user's own record, password hash excluded.
    pub async fn get_self(&self, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        user.map(UserProfile::from)
            .ok_or_else(|| ApiError::not_found("User not found"))
    }
}

fn validate_credentials(credentials: Credentials) -> Result<(String, String), ApiError> {
    let mut errors = Vec::new();

    let username = credentials
        .username
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if username.is_empty() {
        errors.push("Username is required".to_string());
    }

    let password = credentials.password.unwrap_or_default();
    if password.is_empty() {
        errors.push("Password is required".to_string());
    }

    if errors.is_empty() {
        Ok((username, password))
    } else {
        Err(ApiError::validation_error("Validation Error", errors))
    }
}
