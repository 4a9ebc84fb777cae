use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Repository;
use crate::middleware::JwtSecret;
use crate::services::{AllocationService, AuthService, EmployeeService, LookupService, ReportService};

/// Shared application state injected into all route handlers via axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, config: AppConfig) -> Self {
        Self {
            repo,
            config: Arc::new(config),
        }
    }

    pub fn jwt_secret(&self) -> JwtSecret {
        JwtSecret::new(&self.config.security.jwt_secret)
    }

    pub fn employees(&self) -> EmployeeService {
        EmployeeService::new(self.repo.clone())
    }

    pub fn allocations(&self) -> AllocationService {
        AllocationService::new(self.repo.clone())
    }

    pub fn lookups(&self) -> LookupService {
        LookupService::new(self.repo.clone())
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(self.repo.clone())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.repo.clone(), self.config.security.clone())
    }
}
