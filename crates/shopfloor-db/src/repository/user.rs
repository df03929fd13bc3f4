//! # User Repository
//!
//! Users only matter here as owners of sales. Password hashing belongs to
//! the authentication layer; this repository stores the hash it is given and
//! never reads it back.

use sqlx::PgPool;
use tracing::debug;

use crate::error::DbResult;
use shopfloor_core::{NewUser, User};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user. A duplicate email is `DbError::UniqueViolation`.
    pub async fn create(&self, user: &NewUser) -> DbResult<User> {
        debug!(email = %user.email, role = ?user.role, "Creating user");

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_id, first_name, last_name, email, role
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, first_name, last_name, email, role FROM users WHERE user_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Looks a user up by email, case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, first_name, last_name, email, role FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn find_all(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT user_id, first_name, last_name, email, role FROM users ORDER BY user_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
