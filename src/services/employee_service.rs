use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::FieldErrors;
use crate::database::models::{AllocationKind, Employee, NewEmployee};
use crate::database::Repository;
use crate::error::ApiError;
use crate::filter::{EmployeeQuery, Page};

fn default_allocation_type() -> i64 {
    AllocationKind::Bench.id()
}

/// Add/update payload for an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRequest {
    pub name: String,
    pub email: String,
    pub bench_start_date: NaiveDate,
    #[serde(default)]
    pub bench_end_date: Option<NaiveDate>,
    pub job_role_id: i64,
    #[serde(default)]
    pub skill_ids: Vec<i64>,
    #[serde(default = "default_allocation_type")]
    pub allocation_type_id: i64,
}

impl EmployeeRequest {
    /// Validate and map onto the row the repository stores.
    pub fn validate(&self) -> Result<NewEmployee, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 100);
        errors.require_email("email", &self.email);
        errors.require_id("job_role_id", self.job_role_id);
        if AllocationKind::from_id(self.allocation_type_id).is_none() {
            errors.add("allocation_type_id", "Unknown allocation type");
        }
        if let Some(end) = self.bench_end_date {
            errors.require_order("bench_end_date", self.bench_start_date, end);
        }
        if self.skill_ids.iter().any(|id| *id <= 0) {
            errors.add("skill_ids", "skill_ids must be positive ids");
        }
        errors.into_result("Invalid employee")?;

        let mut skill_ids = self.skill_ids.clone();
        skill_ids.sort_unstable();
        skill_ids.dedup();

        Ok(NewEmployee {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            bench_start_date: self.bench_start_date,
            bench_end_date: self.bench_end_date,
            job_role_id: self.job_role_id,
            allocation_type_id: self.allocation_type_id,
            skill_ids,
        })
    }
}

pub struct EmployeeService {
    repo: Arc<dyn Repository>,
}

impl EmployeeService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, query: &EmployeeQuery) -> Result<Page<Employee>, ApiError> {
        Ok(self.repo.list_employees(query).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Employee, ApiError> {
        self.repo
            .get_employee(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Employee {} not found", id)))
    }

    pub async fn create(&self, request: &EmployeeRequest) -> Result<Employee, ApiError> {
        let new = request.validate()?;
        let employee = self.repo.insert_employee(new).await?;
        tracing::info!("Created employee {} ({})", employee.id, employee.email);
        Ok(employee)
    }

    pub async fn update(&self, id: i64, request: &EmployeeRequest) -> Result<Employee, ApiError> {
        let new = request.validate()?;
        let employee = self
            .repo
            .update_employee(id, new)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Employee {} not found", id)))?;
        tracing::info!("Updated employee {}", id);
        Ok(employee)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        if !self.repo.delete_employee(id).await? {
            return Err(ApiError::not_found(format!("Employee {} not found", id)));
        }
        tracing::info!("Deleted employee {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EmployeeRequest {
        EmployeeRequest {
            name: "  Ann Lee ".into(),
            email: "Ann@Example.com".into(),
            bench_start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            bench_end_date: None,
            job_role_id: 1,
            skill_ids: vec![3, 1, 3],
            allocation_type_id: 1,
        }
    }

    #[test]
    fn maps_trimmed_payload() {
        let new = request().validate().unwrap();
        assert_eq!(new.name, "Ann Lee");
        assert_eq!(new.email, "ann@example.com");
        assert_eq!(new.skill_ids, vec![1, 3]);
    }

    #[test]
    fn reports_each_invalid_field() {
        let mut req = request();
        req.name = " ".into();
        req.email = "nope".into();
        req.bench_end_date = NaiveDate::from_ymd_opt(2023, 12, 31);
        req.allocation_type_id = 9;

        let err = req.validate().unwrap_err();
        let fields = err.field_errors().unwrap();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("bench_end_date"));
        assert!(fields.contains_key("allocation_type_id"));
    }

    #[test]
    fn allocation_type_defaults_to_bench() {
        let json = serde_json::json!({
            "name": "Bob",
            "email": "bob@example.com",
            "bench_start_date": "2024-02-01",
            "job_role_id": 2
        });
        let req: EmployeeRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.allocation_type_id, AllocationKind::Bench.id());
        assert!(req.skill_ids.is_empty());
    }
}
