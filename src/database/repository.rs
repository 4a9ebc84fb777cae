use async_trait::async_trait;
use chrono::NaiveDate;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Allocation, AllocationType, DateRangeReportRow, Employee, InternalProject, JobRole,
    JobRoleReportRow, NewAllocation, NewEmployee, NewInternalProject, NewTraining, NewUser,
    SecurityQuestion, Skill, Training, User,
};
use crate::filter::{AllocationQuery, EmployeeQuery, Page};

/// Persistence seam between the services and the backing store.
///
/// `get_*`/`update_*` return `None` and `delete_*` return `false` when the row
/// does not exist; the services turn that into a 404.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Employees
    async fn list_employees(&self, query: &EmployeeQuery) -> Result<Page<Employee>, DatabaseError>;
    async fn get_employee(&self, id: i64) -> Result<Option<Employee>, DatabaseError>;
    async fn insert_employee(&self, employee: NewEmployee) -> Result<Employee, DatabaseError>;
    async fn update_employee(&self, id: i64, employee: NewEmployee) -> Result<Option<Employee>, DatabaseError>;
    async fn delete_employee(&self, id: i64) -> Result<bool, DatabaseError>;

    // Allocations. Insert also moves the employee to the allocation's type.
    async fn list_allocations(&self, query: &AllocationQuery) -> Result<Page<Allocation>, DatabaseError>;
    async fn get_allocation(&self, id: i64) -> Result<Option<Allocation>, DatabaseError>;
    async fn insert_allocation(&self, allocation: NewAllocation) -> Result<Allocation, DatabaseError>;
    async fn update_allocation(&self, id: i64, allocation: NewAllocation) -> Result<Option<Allocation>, DatabaseError>;
    async fn delete_allocation(&self, id: i64) -> Result<bool, DatabaseError>;

    // Lookups
    async fn list_job_roles(&self) -> Result<Vec<JobRole>, DatabaseError>;
    async fn insert_job_role(&self, name: String) -> Result<JobRole, DatabaseError>;
    async fn delete_job_role(&self, id: i64) -> Result<bool, DatabaseError>;
    async fn list_skills(&self) -> Result<Vec<Skill>, DatabaseError>;
    async fn insert_skill(&self, name: String) -> Result<Skill, DatabaseError>;
    async fn delete_skill(&self, id: i64) -> Result<bool, DatabaseError>;
    async fn list_allocation_types(&self) -> Result<Vec<AllocationType>, DatabaseError>;
    async fn list_trainings(&self) -> Result<Vec<Training>, DatabaseError>;
    async fn insert_training(&self, training: NewTraining) -> Result<Training, DatabaseError>;
    async fn list_internal_projects(&self) -> Result<Vec<InternalProject>, DatabaseError>;
    async fn insert_internal_project(&self, project: NewInternalProject) -> Result<InternalProject, DatabaseError>;
    async fn list_security_questions(&self) -> Result<Vec<SecurityQuestion>, DatabaseError>;

    // Users
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn update_user_password(&self, id: i64, hash: String, salt: String) -> Result<bool, DatabaseError>;

    // Reports
    async fn allocations_in_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DateRangeReportRow>, DatabaseError>;
    async fn employees_by_job_roles(&self, job_role_ids: &[i64]) -> Result<Vec<JobRoleReportRow>, DatabaseError>;
}
