pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use password::{hash_secret, verify_secret, SecretHash};

/// Numeric `UserRole` claim values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum Role {
    Admin = 1,
    Manager = 2,
    Allocator = 3,
}

impl Role {
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Allocator => "allocator",
        }
    }
}

impl TryFrom<i16> for Role {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Role::Admin),
            2 => Ok(Role::Manager),
            3 => Ok(Role::Allocator),
            other => Err(format!("unknown role {}", other)),
        }
    }
}

impl From<Role> for i16 {
    fn from(role: Role) -> Self {
        role.as_i16()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    #[serde(rename = "UserRole")]
    pub role: i16,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, username: String, role: Role, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id.to_string(),
            username,
            role: role.as_i16(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry and return the claims
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn round_trips_claims_with_role_claim_name() {
        let claims = Claims::new(7, "ann".into(), Role::Manager, 1);
        let token = generate_jwt(&claims, SECRET).unwrap();
        let decoded = validate_jwt(&token, SECRET).unwrap();
        assert_eq!(decoded, claims);

        let payload = serde_json::to_value(&claims).unwrap();
        assert_eq!(payload["UserRole"], 2);
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = generate_jwt(&Claims::new(1, "a".into(), Role::Admin, 1), SECRET).unwrap();
        assert!(matches!(validate_jwt(&token, "other"), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let mut claims = Claims::new(1, "a".into(), Role::Admin, 1);
        claims.exp = Utc::now().timestamp() - 3600;
        let token = generate_jwt(&claims, SECRET).unwrap();
        assert!(validate_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        let claims = Claims::new(1, "a".into(), Role::Admin, 1);
        assert_eq!(generate_jwt(&claims, ""), Err(AuthError::InvalidSecret));
    }

    #[test]
    fn role_conversions() {
        assert_eq!(Role::try_from(3), Ok(Role::Allocator));
        assert!(Role::try_from(9).is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
