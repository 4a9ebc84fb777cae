use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::validation::FieldErrors;
use crate::auth::password::normalize_answer;
use crate::auth::{generate_jwt, hash_secret, verify_secret, Claims, Role};
use crate::config::{BootstrapAdmin, SecurityConfig};
use crate::database::models::{NewUser, User};
use crate::database::Repository;
use crate::error::ApiError;
use crate::middleware::AuthUser;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Public sign-up only creates allocators; admins create the other roles.
    #[serde(default = "default_signup_role")]
    pub role: Role,
    pub security_question_id: i64,
    pub security_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub username: String,
    pub security_question_id: i64,
    pub security_answer: String,
    pub new_password: String,
}

/// Token handed to the client after sign-in or sign-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    pub role: Role,
    pub expires_in: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

fn default_signup_role() -> Role {
    Role::Allocator
}

/// Role a self-registered account may take.
pub const SELF_SIGNUP_ROLE: Role = Role::Allocator;

fn check_password(errors: &mut FieldErrors, field: &str, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(field, format!("Password must be at least {} characters", MIN_PASSWORD_LEN));
    }
}

impl SignUpRequest {
    pub fn validate(&self) -> Result<NewUser, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_text("username", &self.username, 50);
        errors.require_email("email", &self.email);
        check_password(&mut errors, "password", &self.password);
        errors.require_id("security_question_id", self.security_question_id);
        errors.require_text("security_answer", &self.security_answer, 200);
        errors.into_result("Invalid sign-up")?;

        let password = hash_secret(&self.password);
        let answer = hash_secret(&normalize_answer(&self.security_answer));
        Ok(NewUser {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password_hash: password.hash,
            password_salt: password.salt,
            role: self.role.as_i16(),
            security_question_id: self.security_question_id,
            security_answer_hash: answer.hash,
            security_answer_salt: answer.salt,
        })
    }
}

pub struct AuthService {
    repo: Arc<dyn Repository>,
    security: SecurityConfig,
}

impl AuthService {
    pub fn new(repo: Arc<dyn Repository>, security: SecurityConfig) -> Self {
        Self { repo, security }
    }

    fn issue(&self, user: &User) -> Result<AuthResponse, ApiError> {
        let role = Role::try_from(user.role).map_err(|e| {
            tracing::error!("User {} has invalid role: {}", user.id, e);
            ApiError::internal_server_error("User record is invalid")
        })?;
        let claims = Claims::new(user.id, user.username.clone(), role, self.security.jwt_expiry_hours);
        let token = generate_jwt(&claims, &self.security.jwt_secret)?;

        Ok(AuthResponse {
            token,
            username: user.username.clone(),
            role,
            expires_in: self.security.jwt_expiry_hours * 3600,
        })
    }

    pub async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResponse, ApiError> {
        let user = self.repo.find_user_by_username(request.username.trim()).await?;
        let user = match user {
            Some(user) if verify_secret(&request.password, &user.password_hash, &user.password_salt) => user,
            _ => {
                tracing::warn!("Failed sign-in for {}", request.username);
                return Err(ApiError::unauthorized("Invalid username or password"));
            }
        };

        tracing::info!("User {} signed in as {}", user.username, user.role);
        self.issue(&user)
    }

    /// Anonymous sign-up. Only allocator accounts can be self-registered.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, ApiError> {
        if request.role != SELF_SIGNUP_ROLE {
            tracing::warn!("Refused self sign-up of {} as {}", request.username, request.role);
            let mut errors = FieldErrors::new();
            errors.add("role", "Admin and manager accounts are created by an admin");
            errors.into_result("Invalid sign-up")?;
        }
        let user = self.create_user(request).await?;
        self.issue(&user)
    }

    /// Account creation by an admin; any role, no token issued.
    pub async fn register(&self, request: &SignUpRequest) -> Result<UserInfo, ApiError> {
        let user = self.create_user(request).await?;
        Ok(UserInfo {
            user_id: user.id,
            username: user.username,
            role: request.role,
        })
    }

    /// Creates the configured admin account when no user of that name exists.
    pub async fn ensure_admin(&self, admin: &BootstrapAdmin) -> Result<bool, ApiError> {
        if self.repo.find_user_by_username(admin.username.trim()).await?.is_some() {
            return Ok(false);
        }
        let request = SignUpRequest {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password: admin.password.clone(),
            role: Role::Admin,
            security_question_id: 1,
            security_answer: uuid::Uuid::new_v4().to_string(),
        };
        self.create_user(&request).await?;
        Ok(true)
    }

    async fn create_user(&self, request: &SignUpRequest) -> Result<User, ApiError> {
        let new = request.validate()?;
        let user = self.repo.insert_user(new).await?;
        tracing::info!("Registered user {} ({}) as {}", user.username, user.id, request.role);
        Ok(user)
    }

    pub async fn change_password(
        &self,
        auth: &AuthUser,
        request: &ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        check_password(&mut errors, "new_password", &request.new_password);
        errors.into_result("Invalid password change")?;

        let user = self
            .repo
            .find_user_by_username(&auth.username)
            .await?
            .filter(|user| user.id == auth.user_id)
            .ok_or_else(|| ApiError::unauthorized("User no longer exists"))?;

        if !verify_secret(&request.current_password, &user.password_hash, &user.password_salt) {
            return Err(ApiError::unauthorized("Current password is incorrect"));
        }

        let stored = hash_secret(&request.new_password);
        self.repo.update_user_password(user.id, stored.hash, stored.salt).await?;
        tracing::info!("User {} changed password", user.username);
        Ok(())
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        check_password(&mut errors, "new_password", &request.new_password);
        errors.into_result("Invalid password reset")?;

        let user = self.repo.find_user_by_username(request.username.trim()).await?;
        let user = match user {
            Some(user)
                if user.security_question_id == request.security_question_id
                    && verify_secret(
                        &normalize_answer(&request.security_answer),
                        &user.security_answer_hash,
                        &user.security_answer_salt,
                    ) =>
            {
                user
            }
            _ => {
                tracing::warn!("Failed password reset for {}", request.username);
                return Err(ApiError::unauthorized("Security answer does not match"));
            }
        };

        let stored = hash_secret(&request.new_password);
        self.repo.update_user_password(user.id, stored.hash, stored.salt).await?;
        tracing::info!("User {} reset password", user.username);
        Ok(())
    }

    pub fn whoami(&self, auth: &AuthUser) -> UserInfo {
        UserInfo {
            user_id: auth.user_id,
            username: auth.username.clone(),
            role: auth.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::MemoryRepository;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryRepository::seeded()),
            AppConfig::development().security,
        )
    }

    fn sign_up(username: &str) -> SignUpRequest {
        SignUpRequest {
            username: username.into(),
            email: format!("{}@example.com", username),
            password: "correct horse".into(),
            role: Role::Allocator,
            security_question_id: 1,
            security_answer: " Blue ".into(),
        }
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let svc = service();
        let issued = svc.sign_up(&sign_up("ann")).await.unwrap();
        assert_eq!(issued.role, Role::Allocator);

        let ok = svc
            .sign_in(&SignInRequest { username: "ann".into(), password: "correct horse".into() })
            .await
            .unwrap();
        assert_eq!(ok.username, "ann");

        let bad = svc
            .sign_in(&SignInRequest { username: "ann".into(), password: "wrong password".into() })
            .await;
        assert!(matches!(bad, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn self_sign_up_cannot_claim_admin() {
        let svc = service();
        let mut request = sign_up("eve");
        request.role = Role::Admin;
        let err = svc.sign_up(&request).await.unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("role"));

        let created = svc.register(&request).await.unwrap();
        assert_eq!(created.role, Role::Admin);
    }

    #[tokio::test]
    async fn bootstrap_admin_is_created_once() {
        let svc = service();
        let admin = BootstrapAdmin {
            username: "root".into(),
            email: "root@example.com".into(),
            password: "long enough".into(),
        };
        assert!(svc.ensure_admin(&admin).await.unwrap());
        assert!(!svc.ensure_admin(&admin).await.unwrap());

        let issued = svc
            .sign_in(&SignInRequest { username: "root".into(), password: "long enough".into() })
            .await
            .unwrap();
        assert_eq!(issued.role, Role::Admin);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let svc = service();
        svc.sign_up(&sign_up("bob")).await.unwrap();
        let mut again = sign_up("bob");
        again.email = "other@example.com".into();
        assert!(matches!(svc.sign_up(&again).await, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn reset_accepts_normalized_answer() {
        let svc = service();
        svc.sign_up(&sign_up("cy")).await.unwrap();

        let reset = ResetPasswordRequest {
            username: "cy".into(),
            security_question_id: 1,
            security_answer: "BLUE".into(),
            new_password: "another secret".into(),
        };
        svc.reset_password(&reset).await.unwrap();

        let signed = svc
            .sign_in(&SignInRequest { username: "cy".into(), password: "another secret".into() })
            .await;
        assert!(signed.is_ok());
    }

    #[tokio::test]
    async fn short_password_never_reaches_store() {
        let svc = service();
        let mut req = sign_up("dee");
        req.password = "short".into();
        let err = svc.sign_up(&req).await.unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("password"));
    }
}
