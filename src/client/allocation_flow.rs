use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::ClientError;
use super::services::AllocatorApi;
use crate::database::models::{Allocation, AllocationKind, Employee};
use crate::services::AllocationRequest;

/// What the allocation screen needs from the API.
#[async_trait]
pub trait AllocationGateway: Send + Sync {
    async fn get_employee(&self, id: i64) -> Result<Employee, ClientError>;
    async fn add_allocation(&self, request: &AllocationRequest) -> Result<Allocation, ClientError>;
}

#[async_trait]
impl AllocationGateway for AllocatorApi {
    async fn get_employee(&self, id: i64) -> Result<Employee, ClientError> {
        AllocatorApi::get_employee(self, id).await
    }

    async fn add_allocation(&self, request: &AllocationRequest) -> Result<Allocation, ClientError> {
        Ok(AllocatorApi::add_allocation(self, request).await?.data)
    }
}

/// Editable allocation form, seeded with bench and the first training.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationForm {
    pub type_id: i64,
    pub training_id: Option<i64>,
    pub internal_project_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AllocationForm {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            type_id: AllocationKind::Bench.id(),
            training_id: Some(1),
            internal_project_id: None,
            start_date,
            end_date,
        }
    }

    pub fn kind(&self) -> Option<AllocationKind> {
        AllocationKind::from_id(self.type_id)
    }

    /// Builds the payload, dropping references the chosen type does not use.
    pub fn to_request(&self, employee_id: i64) -> Result<AllocationRequest, ClientError> {
        let kind = self
            .kind()
            .ok_or_else(|| ClientError::validation("type_id", "Choose an allocation type"))?;
        if self.start_date > self.end_date {
            return Err(ClientError::validation("end_date", "End date must not be before start date"));
        }

        let training_id = match kind {
            AllocationKind::Training => Some(
                self.training_id
                    .ok_or_else(|| ClientError::validation("training_id", "Choose a training"))?,
            ),
            _ => None,
        };
        let internal_project_id = match kind {
            AllocationKind::InternalProject => Some(self.internal_project_id.ok_or_else(|| {
                ClientError::validation("internal_project_id", "Choose an internal project")
            })?),
            _ => None,
        };

        Ok(AllocationRequest {
            employee_id,
            allocation_type_id: kind.id(),
            start_date: self.start_date,
            end_date: self.end_date,
            training_id,
            internal_project_id,
        })
    }
}

/// Confirmation shown once an allocation is recorded.
pub fn success_message(kind: AllocationKind) -> &'static str {
    match kind {
        AllocationKind::Training => "Employee allocated to training successfully",
        _ => "Employee allocated successfully",
    }
}

/// Allocation screen for one employee.
pub struct ManageAllocation<'a, G: AllocationGateway> {
    gateway: &'a G,
    pub employee: Employee,
    pub form: AllocationForm,
}

impl<'a, G: AllocationGateway> ManageAllocation<'a, G> {
    pub async fn load(gateway: &'a G, employee_id: i64, today: NaiveDate) -> Result<Self, ClientError> {
        let employee = gateway.get_employee(employee_id).await.map_err(|e| {
            tracing::warn!("Could not load employee {}: {}", employee_id, e);
            e
        })?;

        Ok(Self {
            gateway,
            employee,
            form: AllocationForm::new(today, today),
        })
    }

    pub async fn submit(&self) -> Result<String, ClientError> {
        let request = self.form.to_request(self.employee.id)?;
        let allocation = self.gateway.add_allocation(&request).await.map_err(|e| {
            tracing::warn!("Allocation for employee {} failed: {}", self.employee.id, e);
            e
        })?;

        let kind = AllocationKind::from_id(allocation.allocation_type_id)
            .unwrap_or(AllocationKind::Bench);
        Ok(success_message(kind).to_string())
    }
}
