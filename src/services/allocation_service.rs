use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::FieldErrors;
use crate::database::models::{Allocation, AllocationKind, NewAllocation};
use crate::database::Repository;
use crate::error::ApiError;
use crate::filter::{AllocationQuery, Page};

/// Add/update payload for an allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub employee_id: i64,
    pub allocation_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub training_id: Option<i64>,
    #[serde(default)]
    pub internal_project_id: Option<i64>,
}

impl AllocationRequest {
    /// Enforces the reference rules: bench carries no reference, training
    /// needs a training, internal project needs a project, never both.
    pub fn validate(&self) -> Result<NewAllocation, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_id("employee_id", self.employee_id);
        errors.require_order("end_date", self.start_date, self.end_date);

        let kind = AllocationKind::from_id(self.allocation_type_id);
        match kind {
            None => errors.add("allocation_type_id", "Unknown allocation type"),
            Some(AllocationKind::Bench) => {
                if self.training_id.is_some() {
                    errors.add("training_id", "Bench allocations take no training");
                }
                if self.internal_project_id.is_some() {
                    errors.add("internal_project_id", "Bench allocations take no internal project");
                }
            }
            Some(AllocationKind::Training) => {
                match self.training_id {
                    None => errors.add("training_id", "A training is required"),
                    Some(id) => errors.require_id("training_id", id),
                }
                if self.internal_project_id.is_some() {
                    errors.add("internal_project_id", "Training allocations take no internal project");
                }
            }
            Some(AllocationKind::InternalProject) => {
                match self.internal_project_id {
                    None => errors.add("internal_project_id", "An internal project is required"),
                    Some(id) => errors.require_id("internal_project_id", id),
                }
                if self.training_id.is_some() {
                    errors.add("training_id", "Project allocations take no training");
                }
            }
        }

        errors.into_result("Invalid allocation")?;
        let kind = kind.ok_or_else(|| ApiError::validation_error("Invalid allocation", None))?;

        Ok(NewAllocation {
            employee_id: self.employee_id,
            kind,
            start_date: self.start_date,
            end_date: self.end_date,
            training_id: self.training_id,
            internal_project_id: self.internal_project_id,
        })
    }
}

/// Confirmation text for a recorded allocation.
pub fn allocation_message(kind: AllocationKind) -> &'static str {
    match kind {
        AllocationKind::Bench => "Employee moved to bench",
        AllocationKind::Training => "Employee allocated to training",
        AllocationKind::InternalProject => "Employee allocated to internal project",
    }
}

pub struct AllocationService {
    repo: Arc<dyn Repository>,
}

impl AllocationService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, query: &AllocationQuery) -> Result<Page<Allocation>, ApiError> {
        Ok(self.repo.list_allocations(query).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Allocation, ApiError> {
        self.repo
            .get_allocation(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Allocation {} not found", id)))
    }

    pub async fn create(&self, request: &AllocationRequest) -> Result<Allocation, ApiError> {
        let new = request.validate()?;
        if self.repo.get_employee(new.employee_id).await?.is_none() {
            return Err(ApiError::not_found(format!("Employee {} not found", new.employee_id)));
        }
        let allocation = self.repo.insert_allocation(new).await?;
        tracing::info!(
            "Allocated employee {} as type {} ({} to {})",
            allocation.employee_id,
            allocation.allocation_type_id,
            allocation.start_date,
            allocation.end_date
        );
        Ok(allocation)
    }

    pub async fn update(&self, id: i64, request: &AllocationRequest) -> Result<Allocation, ApiError> {
        let new = request.validate()?;
        self.repo
            .update_allocation(id, new)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Allocation {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        if !self.repo.delete_allocation(id).await? {
            return Err(ApiError::not_found(format!("Allocation {} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(type_id: i64, training: Option<i64>, project: Option<i64>) -> AllocationRequest {
        AllocationRequest {
            employee_id: 1,
            allocation_type_id: type_id,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            training_id: training,
            internal_project_id: project,
        }
    }

    #[test]
    fn training_requires_training_id() {
        let err = request(2, None, None).validate().unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("training_id"));
        assert_eq!(request(2, Some(1), None).validate().unwrap().kind, AllocationKind::Training);
    }

    #[test]
    fn never_both_references() {
        let err = request(3, Some(1), Some(1)).validate().unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("training_id"));
    }

    #[test]
    fn bench_takes_no_reference() {
        assert!(request(1, Some(1), None).validate().is_err());
        assert!(request(1, None, None).validate().is_ok());
    }

    #[test]
    fn rejects_inverted_range_and_unknown_type() {
        let mut req = request(1, None, None);
        req.end_date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert!(req.validate().unwrap_err().field_errors().unwrap().contains_key("end_date"));
        assert!(request(7, None, None).validate().is_err());
    }
}
