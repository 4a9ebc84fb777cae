pub mod allocation;
pub mod employee;
pub mod lookup;
pub mod report;
pub mod user;

pub use allocation::{Allocation, AllocationKind, NewAllocation};
pub use employee::{Employee, NewEmployee};
pub use lookup::{
    AllocationType, InternalProject, JobRole, NewInternalProject, NewTraining, SecurityQuestion,
    Skill, Training,
};
pub use report::{DateRangeReportRow, JobRoleReportRow};
pub use user::{NewUser, User};
