use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub bench_start_date: NaiveDate,
    pub bench_end_date: Option<NaiveDate>,
    pub job_role_id: i64,
    pub allocation_type_id: i64,
    /// Loaded from `employee_skills` after the main row.
    #[sqlx(skip)]
    pub skill_ids: Vec<i64>,
}

/// Insert/replace payload for an employee row and its skill links.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub bench_start_date: NaiveDate,
    pub bench_end_date: Option<NaiveDate>,
    pub job_role_id: i64,
    pub allocation_type_id: i64,
    pub skill_ids: Vec<i64>,
}

impl NewEmployee {
    pub fn into_employee(self, id: i64) -> Employee {
        Employee {
            id,
            name: self.name,
            email: self.email,
            bench_start_date: self.bench_start_date,
            bench_end_date: self.bench_end_date,
            job_role_id: self.job_role_id,
            allocation_type_id: self.allocation_type_id,
            skill_ids: self.skill_ids,
        }
    }
}
