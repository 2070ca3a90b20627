//! Listing filters, pagination and the per-type summary.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{DepartmentId, DesignationId, EmployeeId, EmployeeType, PayMaster};

/// Largest page size accepted by [`Pagination`].
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Optional filters for listing payroll records.
///
/// Type, department and designation filters apply to the snapshot taken at
/// generation time, not to the employee's current attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollFilter {
    /// Period month.
    #[serde(default)]
    pub month: Option<u32>,
    /// Period year.
    #[serde(default)]
    pub year: Option<i32>,
    /// A single employee.
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    /// Employee type at generation time.
    #[serde(default)]
    pub employee_type: Option<EmployeeType>,
    /// Department at generation time.
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    /// Designation at generation time.
    #[serde(default)]
    pub designation_id: Option<DesignationId>,
}

impl PayrollFilter {
    /// Returns true if the record passes every filter that is set.
    pub fn matches(&self, record: &PayMaster) -> bool {
        self.month.is_none_or(|m| m == record.month)
            && self.year.is_none_or(|y| y == record.year)
            && self.employee_id.is_none_or(|id| id == record.employee_id)
            && self.employee_type.is_none_or(|t| t == record.employee_type)
            && self.department_id.is_none_or(|d| d == record.department_id)
            && self.designation_id.is_none_or(|d| d == record.designation_id)
    }
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// One-based page number.
    pub page: u32,
    /// Rows per page, 1 to [`MAX_PAGE_LIMIT`].
    pub limit: u32,
}

impl Pagination {
    /// Creates a page request.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `page` is zero or `limit` is
    /// outside 1 to [`MAX_PAGE_LIMIT`].
    pub fn new(page: u32, limit: u32) -> EngineResult<Self> {
        if page == 0 {
            return Err(EngineError::validation("page", "must be at least 1"));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(EngineError::validation(
                "limit",
                format!("must be between 1 and {}", MAX_PAGE_LIMIT),
            ));
        }
        Ok(Self { page, limit })
    }

    fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Page metadata returned with a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// The page returned.
    pub current_page: u32,
    /// Number of pages at the requested limit.
    pub total_pages: u32,
    /// Number of rows matching the filter.
    pub total_count: usize,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

/// Count and totals of one employee type within a listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeSummary {
    /// Number of records.
    pub count: usize,
    /// Sum of gross salary.
    pub total_gross: Decimal,
    /// Sum of net salary.
    pub total_net: Decimal,
}

/// One page of payroll records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollPage {
    /// The records on this page.
    pub items: Vec<PayMaster>,
    /// Page metadata.
    pub pagination: PageInfo,
    /// Per-type totals over every record matching the filter.
    pub type_summary: BTreeMap<EmployeeType, TypeSummary>,
}

/// Filters, orders and paginates a company's records.
///
/// Rows are ordered by year desc, month desc, employee id asc. Filters are
/// applied before pagination, so `total_count` is the number of matching
/// rows.
pub fn paginate(
    records: Vec<PayMaster>,
    filter: &PayrollFilter,
    pagination: Pagination,
) -> PayrollPage {
    let mut matching: Vec<PayMaster> = records.into_iter().filter(|r| filter.matches(r)).collect();
    matching.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then(b.month.cmp(&a.month))
            .then(a.employee_id.cmp(&b.employee_id))
    });

    let mut type_summary: BTreeMap<EmployeeType, TypeSummary> = BTreeMap::new();
    for record in &matching {
        let entry = type_summary.entry(record.employee_type).or_default();
        entry.count += 1;
        entry.total_gross += record.gross_salary;
        entry.total_net += record.net_salary;
    }

    let total_count = matching.len();
    let limit = pagination.limit as usize;
    let total_pages = total_count.div_ceil(limit) as u32;
    let offset = pagination.offset();

    let items: Vec<PayMaster> = matching.into_iter().skip(offset).take(limit).collect();

    PayrollPage {
        items,
        pagination: PageInfo {
            current_page: pagination.page,
            total_pages,
            total_count,
            has_next: offset + limit < total_count,
            has_prev: pagination.page > 1,
        },
        type_summary,
    }
}
