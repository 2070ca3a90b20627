//! Pay parameter resolution.
//!
//! Finds the parameter set that applies to an employee on a given date.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{CompanyId, DepartmentId, DesignationId, EmployeeType, PayParameter};

/// Resolves the pay parameter set for an employee on `as_of`.
///
/// Candidates must belong to the company, match the employee type, and for
/// every dimension they are scoped by (department, designation) match the
/// employee's value. The most specific scope wins; among equally specific
/// candidates the latest `effective_date` on or before `as_of` wins.
///
/// Returns `None` when nothing is configured for the employee.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::resolve_pay_parameter;
/// use payroll_engine::models::{EmployeeType, PayParameter, PayScope};
/// use chrono::NaiveDate;
///
/// let date = |m| NaiveDate::from_ymd_opt(2025, m, 1).unwrap();
/// let type_wide = PayParameter::zero_rated(1, PayScope::for_type(EmployeeType::Permanent), date(1));
/// let department = PayParameter::zero_rated(
///     1,
///     PayScope { employee_type: EmployeeType::Permanent, department_id: Some(4), designation_id: None },
///     date(1),
/// );
/// let candidates = [type_wide, department];
///
/// let resolved = resolve_pay_parameter(&candidates, 1, EmployeeType::Permanent, Some(4), Some(2), date(6)).unwrap();
/// assert_eq!(resolved.scope.department_id, Some(4));
///
/// let resolved = resolve_pay_parameter(&candidates, 1, EmployeeType::Permanent, Some(5), Some(2), date(6)).unwrap();
/// assert_eq!(resolved.scope.department_id, None);
/// ```
pub fn resolve_pay_parameter<'a>(
    candidates: &'a [PayParameter],
    company_id: CompanyId,
    employee_type: EmployeeType,
    department_id: Option<DepartmentId>,
    designation_id: Option<DesignationId>,
    as_of: NaiveDate,
) -> Option<&'a PayParameter> {
    let resolved = candidates
        .iter()
        .filter(|p| p.company_id == company_id)
        .filter(|p| p.effective_date <= as_of)
        .filter(|p| p.scope.matches(employee_type, department_id, designation_id))
        .max_by(|a, b| {
            a.scope
                .specificity()
                .cmp(&b.scope.specificity())
                .then(a.effective_date.cmp(&b.effective_date))
        });

    debug!(
        company_id,
        employee_type = %employee_type,
        ?department_id,
        ?designation_id,
        %as_of,
        found = resolved.is_some(),
        "Resolved pay parameter"
    );

    resolved
}
