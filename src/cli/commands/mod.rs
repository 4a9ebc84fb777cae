pub mod admin;
pub mod allocator;
pub mod auth;
pub mod manager;
pub mod proxy;
pub mod reports;
pub mod server;

use clap::Args;

use crate::client::capitalize;
use crate::database::models::Employee;
use crate::filter::ListParams;

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(long, help = "Page number (1-based)")]
    pub page: Option<u32>,
    #[arg(long, help = "Rows per page")]
    pub page_size: Option<u32>,
    #[arg(long, help = "Search by name or email")]
    pub search: Option<String>,
    #[arg(long, help = "Sort, e.g. \"name desc\"")]
    pub sort: Option<String>,
}

impl ListArgs {
    pub fn params(&self) -> ListParams {
        ListParams {
            page: self.page,
            page_size: self.page_size,
            search: self.search.clone(),
            sort: self.sort.clone(),
            ..ListParams::default()
        }
    }
}

pub(crate) fn employee_line(e: &Employee) -> String {
    format!(
        "{:>5}  {:<28} {:<32} role={} type={} bench_since={}",
        e.id,
        capitalize(&e.name),
        e.email,
        e.job_role_id,
        e.allocation_type_id,
        e.bench_start_date
    )
}
