use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::ClientError;
use super::services::ManagerApi;
use crate::database::models::{DateRangeReportRow, JobRoleReportRow};

pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one job role";

#[async_trait]
pub trait ReportGateway: Send + Sync {
    async fn date_range_report(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DateRangeReportRow>, ClientError>;
    async fn job_role_report(&self, job_role_ids: &[i64]) -> Result<Vec<JobRoleReportRow>, ClientError>;
}

#[async_trait]
impl ReportGateway for ManagerApi {
    async fn date_range_report(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DateRangeReportRow>, ClientError> {
        ManagerApi::date_range_report(self, from, to).await
    }

    async fn job_role_report(&self, job_role_ids: &[i64]) -> Result<Vec<JobRoleReportRow>, ClientError> {
        ManagerApi::job_role_report(self, job_role_ids).await
    }
}

/// Job-role report form: selected roles, last error and last result.
#[derive(Debug, Default)]
pub struct JobRoleReportForm {
    pub selected: Vec<i64>,
    pub error: Option<String>,
    pub rows: Vec<JobRoleReportRow>,
}

impl JobRoleReportForm {
    pub fn new(selected: Vec<i64>) -> Self {
        Self {
            selected,
            ..Self::default()
        }
    }

    pub async fn submit<G: ReportGateway + ?Sized>(&mut self, gateway: &G) -> Result<(), ClientError> {
        if self.selected.is_empty() {
            self.error = Some(EMPTY_SELECTION_MESSAGE.to_string());
            return Err(ClientError::validation("job_role_ids", EMPTY_SELECTION_MESSAGE));
        }

        match gateway.job_role_report(&self.selected).await {
            Ok(rows) => {
                self.error = None;
                self.rows = rows;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Job role report failed: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

#[derive(Debug)]
pub struct DateRangeReportForm {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub error: Option<String>,
    pub rows: Vec<DateRangeReportRow>,
}

impl DateRangeReportForm {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from,
            to,
            error: None,
            rows: Vec::new(),
        }
    }

    pub async fn submit<G: ReportGateway + ?Sized>(&mut self, gateway: &G) -> Result<(), ClientError> {
        if self.from > self.to {
            let message = "Start date must not be after end date";
            self.error = Some(message.to_string());
            return Err(ClientError::validation("to", message));
        }

        match gateway.date_range_report(self.from, self.to).await {
            Ok(rows) => {
                self.error = None;
                self.rows = rows;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Date range report failed: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
