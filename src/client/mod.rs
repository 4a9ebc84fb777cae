//! Typed client for the allocation API: token storage, route guards, the
//! bearer interceptor, per-role endpoint wrappers and the form flows the
//! `allocator` CLI drives.

pub mod allocation_flow;
pub mod api_client;
pub mod error;
pub mod guard;
pub mod pipe;
pub mod report_form;
pub mod services;
pub mod session;
pub mod token_store;

pub use allocation_flow::{AllocationForm, AllocationGateway, ManageAllocation};
pub use api_client::{ApiClient, ApiReply};
pub use error::ClientError;
pub use guard::{GuardOutcome, RouteGuard, ADMIN_GUARD, ALLOCATOR_GUARD, HOME_ROUTE, MANAGER_GUARD};
pub use pipe::capitalize;
pub use report_form::{DateRangeReportForm, JobRoleReportForm, ReportGateway};
pub use services::{AdminApi, AllocatorApi, LookupApi, ManagerApi};
pub use session::AuthService;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
