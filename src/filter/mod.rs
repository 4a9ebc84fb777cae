pub mod error;
pub mod filter_order;
pub mod types;

pub use error::FilterError;
pub use filter_order::FilterOrder;
pub use types::*;

use crate::config::ApiConfig;

pub const EMPLOYEE_SORT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "email",
    "bench_start_date",
    "bench_end_date",
    "job_role_id",
    "allocation_type_id",
];

pub const ALLOCATION_SORT_COLUMNS: &[&str] = &[
    "id",
    "employee_id",
    "allocation_type_id",
    "start_date",
    "end_date",
];

impl ListParams {
    pub fn page_request(&self, api: &ApiConfig) -> Result<PageRequest, FilterError> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(FilterError::InvalidPage("page numbers start at 1".to_string()));
        }
        let page_size = self.page_size.unwrap_or(api.default_page_size);
        if page_size == 0 {
            return Err(FilterError::InvalidPage("page_size must be positive".to_string()));
        }
        Ok(PageRequest {
            page,
            page_size: page_size.min(api.max_page_size),
        })
    }

    pub fn employee_query(&self, api: &ApiConfig) -> Result<EmployeeQuery, FilterError> {
        Ok(EmployeeQuery {
            page: self.page_request(api)?,
            search: self.trimmed_search(),
            order: self.order(EMPLOYEE_SORT_COLUMNS)?,
            allocation_type_id: self.allocation_type_id,
        })
    }

    pub fn allocation_query(&self, api: &ApiConfig) -> Result<AllocationQuery, FilterError> {
        Ok(AllocationQuery {
            page: self.page_request(api)?,
            employee_id: self.employee_id,
            order: self.order(ALLOCATION_SORT_COLUMNS)?,
        })
    }

    fn order(&self, allowed: &[&str]) -> Result<Vec<FilterOrderInfo>, FilterError> {
        match self.sort.as_deref() {
            Some(sort) => FilterOrder::validate_and_parse(sort, allowed),
            None => Ok(Vec::new()),
        }
    }

    fn trimmed_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn defaults_to_first_page() {
        let api = AppConfig::development().api;
        let page = ListParams::default().page_request(&api).unwrap();
        assert_eq!(page, PageRequest { page: 1, page_size: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn clamps_page_size_and_computes_offset() {
        let api = AppConfig::development().api;
        let params = ListParams { page: Some(3), page_size: Some(500), ..Default::default() };
        let page = params.page_request(&api).unwrap();
        assert_eq!(page.page_size, 100);
        assert_eq!(page.offset(), 200);
    }

    #[test]
    fn rejects_page_zero() {
        let api = AppConfig::development().api;
        let params = ListParams { page: Some(0), ..Default::default() };
        assert!(params.page_request(&api).is_err());
    }

    #[test]
    fn blank_search_is_dropped() {
        let api = AppConfig::development().api;
        let params = ListParams { search: Some("   ".into()), ..Default::default() };
        assert_eq!(params.employee_query(&api).unwrap().search, None);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<i32> = Page::new(vec![], 21, PageRequest { page: 1, page_size: 10 });
        assert_eq!(page.total_pages(), 3);
    }
}
