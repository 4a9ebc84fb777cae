use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One allocation overlapping the requested date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DateRangeReportRow {
    pub allocation_id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub job_role: String,
    pub allocation_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub training: Option<String>,
    pub internal_project: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobRoleReportRow {
    pub employee_id: i64,
    pub employee_name: String,
    pub email: String,
    pub job_role: String,
    pub allocation_type: String,
    pub bench_start_date: NaiveDate,
}
