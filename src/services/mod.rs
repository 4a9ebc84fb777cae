pub mod allocation_service;
pub mod auth_service;
pub mod employee_service;
pub mod lookup_service;
pub mod report_service;
pub mod validation;

pub use allocation_service::{allocation_message, AllocationRequest, AllocationService};
pub use auth_service::{
    AuthResponse, AuthService, ChangePasswordRequest, ResetPasswordRequest, SignInRequest,
    SignUpRequest, UserInfo,
};
pub use employee_service::{EmployeeRequest, EmployeeService};
pub use lookup_service::{InternalProjectRequest, LookupService, NameRequest, TrainingRequest};
pub use report_service::{DateRangeParams, JobRoleReportRequest, ReportService};
pub use validation::FieldErrors;
