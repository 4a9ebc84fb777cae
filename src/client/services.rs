use chrono::NaiveDate;
use serde_json::json;

use super::api_client::{ApiClient, ApiReply};
use super::error::ClientError;
use crate::database::models::{
    Allocation, AllocationType, DateRangeReportRow, Employee, InternalProject, JobRole,
    JobRoleReportRow, Skill, Training,
};
use crate::filter::{ListParams, Page};
use crate::services::{
    AllocationRequest, EmployeeRequest, InternalProjectRequest, NameRequest, SignUpRequest,
    TrainingRequest, UserInfo,
};

/// Reference data readable by every role.
#[derive(Clone)]
pub struct LookupApi {
    api: ApiClient,
}

impl LookupApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn job_roles(&self) -> Result<Vec<JobRole>, ClientError> {
        Ok(self.api.get("api/jobroles").await?.data)
    }

    pub async fn skills(&self) -> Result<Vec<Skill>, ClientError> {
        Ok(self.api.get("api/skills").await?.data)
    }

    pub async fn allocation_types(&self) -> Result<Vec<AllocationType>, ClientError> {
        Ok(self.api.get("api/allocation-types").await?.data)
    }

    pub async fn trainings(&self) -> Result<Vec<Training>, ClientError> {
        Ok(self.api.get("api/trainings").await?.data)
    }

    pub async fn internal_projects(&self) -> Result<Vec<InternalProject>, ClientError> {
        Ok(self.api.get("api/internal-projects").await?.data)
    }
}

#[derive(Clone)]
pub struct AdminApi {
    api: ApiClient,
}

impl AdminApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_employees(&self, params: &ListParams) -> Result<Page<Employee>, ClientError> {
        Ok(self.api.get_query("api/admin/employees", params).await?.data)
    }

    pub async fn get_employee(&self, id: i64) -> Result<Employee, ClientError> {
        Ok(self.api.get(&format!("api/admin/employees/{}", id)).await?.data)
    }

    pub async fn add_employee(&self, request: &EmployeeRequest) -> Result<ApiReply<Employee>, ClientError> {
        self.api.post("api/admin/employees", request).await
    }

    pub async fn update_employee(
        &self,
        id: i64,
        request: &EmployeeRequest,
    ) -> Result<ApiReply<Employee>, ClientError> {
        self.api.put(&format!("api/admin/employees/{}", id), request).await
    }

    pub async fn delete_employee(&self, id: i64) -> Result<String, ClientError> {
        Ok(self.api.delete::<()>(&format!("api/admin/employees/{}", id)).await?.message)
    }

    pub async fn add_job_role(&self, name: &str) -> Result<JobRole, ClientError> {
        let request = NameRequest { name: name.to_string() };
        Ok(self.api.post("api/admin/jobroles", &request).await?.data)
    }

    pub async fn delete_job_role(&self, id: i64) -> Result<String, ClientError> {
        Ok(self.api.delete::<()>(&format!("api/admin/jobroles/{}", id)).await?.message)
    }

    pub async fn add_skill(&self, name: &str) -> Result<Skill, ClientError> {
        let request = NameRequest { name: name.to_string() };
        Ok(self.api.post("api/admin/skills", &request).await?.data)
    }

    pub async fn delete_skill(&self, id: i64) -> Result<String, ClientError> {
        Ok(self.api.delete::<()>(&format!("api/admin/skills/{}", id)).await?.message)
    }

    pub async fn add_user(&self, request: &SignUpRequest) -> Result<UserInfo, ClientError> {
        Ok(self.api.post("api/admin/users", request).await?.data)
    }
}

#[derive(Clone)]
pub struct ManagerApi {
    api: ApiClient,
}

impl ManagerApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_employees(&self, params: &ListParams) -> Result<Page<Employee>, ClientError> {
        Ok(self.api.get_query("api/manager/employees", params).await?.data)
    }

    pub async fn get_employee(&self, id: i64) -> Result<Employee, ClientError> {
        Ok(self.api.get(&format!("api/manager/employees/{}", id)).await?.data)
    }

    pub async fn add_training(&self, request: &TrainingRequest) -> Result<Training, ClientError> {
        Ok(self.api.post("api/manager/trainings", request).await?.data)
    }

    pub async fn add_internal_project(
        &self,
        request: &InternalProjectRequest,
    ) -> Result<InternalProject, ClientError> {
        Ok(self.api.post("api/manager/internal-projects", request).await?.data)
    }

    pub async fn date_range_report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DateRangeReportRow>, ClientError> {
        let query = [("from", from.to_string()), ("to", to.to_string())];
        Ok(self.api.get_query("api/manager/reports/date-range", &query).await?.data)
    }

    pub async fn job_role_report(&self, job_role_ids: &[i64]) -> Result<Vec<JobRoleReportRow>, ClientError> {
        let body = json!({ "job_role_ids": job_role_ids });
        Ok(self.api.post("api/manager/reports/job-role", &body).await?.data)
    }
}

#[derive(Clone)]
pub struct AllocatorApi {
    api: ApiClient,
}

impl AllocatorApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_bench_employees(&self, params: &ListParams) -> Result<Page<Employee>, ClientError> {
        Ok(self.api.get_query("api/allocator/employees", params).await?.data)
    }

    pub async fn get_employee(&self, id: i64) -> Result<Employee, ClientError> {
        Ok(self.api.get(&format!("api/allocator/employees/{}", id)).await?.data)
    }

    pub async fn list_allocations(&self, params: &ListParams) -> Result<Page<Allocation>, ClientError> {
        Ok(self.api.get_query("api/allocator/allocations", params).await?.data)
    }

    pub async fn get_allocation(&self, id: i64) -> Result<Allocation, ClientError> {
        Ok(self.api.get(&format!("api/allocator/allocations/{}", id)).await?.data)
    }

    pub async fn add_allocation(&self, request: &AllocationRequest) -> Result<ApiReply<Allocation>, ClientError> {
        self.api.post("api/allocator/allocations", request).await
    }

    pub async fn update_allocation(
        &self,
        id: i64,
        request: &AllocationRequest,
    ) -> Result<ApiReply<Allocation>, ClientError> {
        self.api.put(&format!("api/allocator/allocations/{}", id), request).await
    }

    pub async fn delete_allocation(&self, id: i64) -> Result<String, ClientError> {
        Ok(self.api.delete::<()>(&format!("api/allocator/allocations/{}", id)).await?.message)
    }
}
