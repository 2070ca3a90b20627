//! The payroll ledger.
//!
//! [`PayrollStore`] is the persistence seam of the engine. The store owns
//! the unique (employee, month, year) index and is the authoritative guard
//! against duplicate rows; batch commits are all-or-nothing.

mod correction;
mod memory;
mod query;

pub use correction::{CorrectionPatch, apply_correction};
pub use memory::InMemoryPayrollStore;
pub use query::{MAX_PAGE_LIMIT, PageInfo, Pagination, PayrollFilter, PayrollPage, TypeSummary, paginate};

use crate::error::{EngineError, EngineResult};
use crate::models::{CompanyId, EmployeeId, PayMaster, PayMasterId, PayPeriod};

/// Persistence for payroll records.
///
/// Every method is scoped by company: no call returns or touches another
/// tenant's rows.
pub trait PayrollStore: Send + Sync {
    /// Counts rows that already exist for the given employees and period.
    fn count_existing(
        &self,
        company_id: CompanyId,
        period: PayPeriod,
        employee_ids: &[EmployeeId],
    ) -> EngineResult<usize>;

    /// Inserts every record or none of them.
    ///
    /// Ids are assigned on commit and the stored records are returned.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicatePeriod`] if any record collides with
    /// the unique (employee, month, year) index, including collisions within
    /// the batch itself, and [`EngineError::Persistence`] for any other
    /// storage failure. In both cases nothing is written.
    fn commit_batch(&self, records: Vec<PayMaster>) -> EngineResult<Vec<PayMaster>>;

    /// Fetches one record of a company.
    fn get(&self, company_id: CompanyId, id: PayMasterId) -> EngineResult<Option<PayMaster>>;

    /// Overwrites an existing record.
    ///
    /// The record's id, company, employee and period must match the stored
    /// row; the correction path never moves a row.
    fn replace(&self, record: PayMaster) -> EngineResult<PayMaster>;

    /// All records of a company, optionally restricted to one period.
    fn records(
        &self,
        company_id: CompanyId,
        period: Option<PayPeriod>,
    ) -> EngineResult<Vec<PayMaster>>;

    /// Number of records held for a company.
    fn count_for_company(&self, company_id: CompanyId) -> EngineResult<usize>;
}

/// Fails if the company has any payroll history.
///
/// Tenant deletion must call this first: payroll rows are never deleted
/// on their own.
///
/// # Errors
///
/// Returns [`EngineError::CompanyHasPayrollHistory`] when at least one
/// record exists for the company.
pub fn ensure_company_deletable(store: &dyn PayrollStore, company_id: CompanyId) -> EngineResult<()> {
    let records = store.count_for_company(company_id)?;
    if records > 0 {
        return Err(EngineError::CompanyHasPayrollHistory {
            company_id,
            records,
        });
    }
    Ok(())
}
