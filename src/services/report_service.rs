use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::FieldErrors;
use crate::database::models::{DateRangeReportRow, JobRoleReportRow};
use crate::database::Repository;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRangeParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRoleReportRequest {
    #[serde(default)]
    pub job_role_ids: Vec<i64>,
}

impl JobRoleReportRequest {
    pub fn validate(&self) -> Result<Vec<i64>, ApiError> {
        let mut errors = FieldErrors::new();
        if self.job_role_ids.is_empty() {
            errors.add("job_role_ids", "Select at least one job role");
        }
        for id in &self.job_role_ids {
            errors.require_id("job_role_ids", *id);
        }
        errors.into_result("Invalid report selection")?;

        let mut ids = self.job_role_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

pub struct ReportService {
    repo: Arc<dyn Repository>,
}

impl ReportService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Allocations overlapping the inclusive `[from, to]` window.
    pub async fn date_range(&self, params: &DateRangeParams) -> Result<Vec<DateRangeReportRow>, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_order("to", params.from, params.to);
        errors.into_result("Invalid date range")?;

        Ok(self.repo.allocations_in_range(params.from, params.to).await?)
    }

    pub async fn by_job_role(&self, request: &JobRoleReportRequest) -> Result<Vec<JobRoleReportRow>, ApiError> {
        let ids = request.validate()?;
        Ok(self.repo.employees_by_job_roles(&ids).await?)
    }
}
