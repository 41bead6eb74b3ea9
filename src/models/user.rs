//! User model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Role a user plays in the scheduling system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Student,
    Instructor,
    Mentor,
}

impl AccountType {
    /// Instructors and mentors post availability and host appointments
    pub fn can_host(&self) -> bool {
        matches!(self, AccountType::Instructor | AccountType::Mentor)
    }

    /// Only students reserve appointments
    pub fn can_book(&self) -> bool {
        matches!(self, AccountType::Student)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Student => write!(f, "student"),
            AccountType::Instructor => write!(f, "instructor"),
            AccountType::Mentor => write!(f, "mentor"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub pronouns: Option<String>,
    pub title: Option<String>,
    pub account_type: AccountType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub pronouns: Option<String>,
    pub title: Option<String>,
    pub account_type: AccountType,
}
