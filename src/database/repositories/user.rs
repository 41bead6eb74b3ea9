//! User repository implementation

use sqlx::{PgConnection, PgPool};
use chrono::Utc;
use crate::models::user::{User, CreateUserRequest};
use crate::utils::errors::MentorWebError;

const USER_COLUMNS: &str = "id, name, email, pronouns, title, account_type, created_at, updated_at";

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, MentorWebError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, pronouns, title, account_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(request.name)
        .bind(request.email)
        .bind(request.pronouns)
        .bind(request.title)
        .bind(request.account_type)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, MentorWebError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find user by ID inside the caller's transaction
    pub async fn find_by_id_in(&self, conn: &mut PgConnection, id: i64) -> Result<Option<User>, MentorWebError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(user)
    }

    /// Row-lock a user until the transaction ends. Returns false when the user
    /// does not exist.
    pub async fn lock_for_update(&self, conn: &mut PgConnection, id: i64) -> Result<bool, MentorWebError> {
        let locked: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(locked.is_some())
    }
}
