use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored account. Hashes and salts never leave the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub password_salt: String,
    pub role: i16,
    pub security_question_id: i64,
    #[serde(skip_serializing)]
    pub security_answer_hash: String,
    #[serde(skip_serializing)]
    pub security_answer_salt: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub role: i16,
    pub security_question_id: i64,
    pub security_answer_hash: String,
    pub security_answer_salt: String,
}

impl NewUser {
    pub fn into_user(self, id: i64, created_at: DateTime<Utc>) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            password_salt: self.password_salt,
            role: self.role,
            security_question_id: self.security_question_id,
            security_answer_hash: self.security_answer_hash,
            security_answer_salt: self.security_answer_salt,
            created_at,
        }
    }
}
