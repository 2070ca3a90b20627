//! Statutory deduction rules.
//!
//! EPF and ESI are shared by the salary calculator and the compliance
//! report, which recomputes the expected values of stored records.

use rust_decimal::Decimal;

use crate::models::EmployeeType;

/// Converts a 0-100 percentage into a fraction.
pub(crate) fn percent(rate: Decimal) -> Decimal {
    rate / Decimal::ONE_HUNDRED
}

/// Computes the EPF deduction.
///
/// EPF applies only to permanent and contract employees whose basic salary
/// is at or below the limit. Above the limit nothing is deducted: the limit
/// is a cliff, not a cap.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::epf_contribution;
/// use payroll_engine::models::EmployeeType;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rate = Decimal::new(12, 0);
/// let limit = Decimal::new(15000, 0);
///
/// let at_limit = epf_contribution(limit, rate, limit, EmployeeType::Permanent);
/// assert_eq!(at_limit, Decimal::new(1800, 0));
///
/// let above = epf_contribution(Decimal::from_str("15000.01").unwrap(), rate, limit, EmployeeType::Permanent);
/// assert_eq!(above, Decimal::ZERO);
/// ```
pub fn epf_contribution(
    basic_salary: Decimal,
    epf_rate: Decimal,
    epf_salary_limit: Decimal,
    employee_type: EmployeeType,
) -> Decimal {
    if employee_type.has_statutory_contributions() && basic_salary <= epf_salary_limit {
        basic_salary * percent(epf_rate)
    } else {
        Decimal::ZERO
    }
}

/// Computes the ESI deduction.
///
/// ESI applies only to permanent and contract employees whose gross salary
/// is at or below the limit, with the same cliff semantics as EPF.
pub fn esi_contribution(
    gross_salary: Decimal,
    esi_rate: Decimal,
    esi_salary_limit: Decimal,
    employee_type: EmployeeType,
) -> Decimal {
    if employee_type.has_statutory_contributions() && gross_salary <= esi_salary_limit {
        gross_salary * percent(esi_rate)
    } else {
        Decimal::ZERO
    }
}
