use serde::Deserialize;

use super::api_client::ApiClient;
use super::error::ClientError;
use super::guard::peek_claims;
use crate::auth::Role;
use crate::database::models::SecurityQuestion;
use crate::services::{
    AuthResponse, ChangePasswordRequest, ResetPasswordRequest, SignInRequest, SignUpRequest,
    UserInfo,
};

#[derive(Debug, Deserialize)]
struct SessionClaims {
    username: String,
    #[serde(rename = "UserRole")]
    role: i16,
}

/// Client-side auth state. Every accessor re-reads the token store.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn claims(&self) -> Option<SessionClaims> {
        self.api.tokens().token().and_then(|t| peek_claims(&t))
    }

    pub fn is_authenticated(&self) -> bool {
        self.claims().is_some()
    }

    pub fn username(&self) -> Option<String> {
        self.claims().map(|c| c.username)
    }

    pub fn role(&self) -> Option<Role> {
        self.claims().and_then(|c| Role::try_from(c.role).ok())
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let request = SignInRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let reply = self.api.post::<AuthResponse, _>("auth/signin", &request).await?;
        self.api.tokens().set_token(&reply.data.token)?;
        tracing::info!("Signed in as {} ({})", reply.data.username, reply.data.role);
        Ok(reply.data)
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, ClientError> {
        let reply = self.api.post::<AuthResponse, _>("auth/signup", request).await?;
        self.api.tokens().set_token(&reply.data.token)?;
        Ok(reply.data)
    }

    pub fn sign_out(&self) -> Result<(), ClientError> {
        self.api.tokens().clear()
    }

    pub async fn whoami(&self) -> Result<UserInfo, ClientError> {
        if self.api.tokens().token().is_none() {
            return Err(ClientError::NotAuthenticated);
        }
        Ok(self.api.get("api/auth/whoami").await?.data)
    }

    pub async fn change_password(&self, current: &str, new: &str) -> Result<String, ClientError> {
        let request = ChangePasswordRequest {
            current_password: current.to_string(),
            new_password: new.to_string(),
        };
        Ok(self.api.put::<(), _>("api/auth/change-password", &request).await?.message)
    }

    pub async fn security_questions(&self) -> Result<Vec<SecurityQuestion>, ClientError> {
        Ok(self.api.get("auth/security-questions").await?.data)
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<String, ClientError> {
        Ok(self.api.post::<(), _>("auth/reset-password", request).await?.message)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::{generate_jwt, Claims};
    use crate::client::token_store::{MemoryTokenStore, TokenStore};

    #[test]
    fn state_follows_token_store() {
        let tokens = Arc::new(MemoryTokenStore::new());
        let api = ApiClient::new("http://localhost:3000", tokens.clone()).unwrap();
        let auth = AuthService::new(api);
        assert!(!auth.is_authenticated());
        assert_eq!(auth.role(), None);

        let token = generate_jwt(&Claims::new(4, "ann".into(), Role::Allocator, 1), "s").unwrap();
        tokens.set_token(&token).unwrap();
        assert!(auth.is_authenticated());
        assert_eq!(auth.username().as_deref(), Some("ann"));
        assert_eq!(auth.role(), Some(Role::Allocator));

        auth.sign_out().unwrap();
        assert!(!auth.is_authenticated());
    }
}
