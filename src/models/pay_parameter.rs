//! Pay parameter model.
//!
//! A [`PayParameter`] is the rate configuration applied to a class of
//! employees, identified by its [`PayScope`] and effective date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{CompanyId, DepartmentId, DesignationId, EmployeeType};

fn default_epf_salary_limit() -> Decimal {
    Decimal::new(15000, 0)
}

fn default_esi_salary_limit() -> Decimal {
    Decimal::new(25000, 0)
}

fn default_paid_leave_per_month() -> Decimal {
    Decimal::ONE
}

/// The class of employees a parameter set applies to.
///
/// The employee type is always part of the scope; department and
/// designation narrow it further when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayScope {
    /// Employee type this set applies to.
    pub employee_type: EmployeeType,
    /// Restricts the set to one department.
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    /// Restricts the set to one designation.
    #[serde(default)]
    pub designation_id: Option<DesignationId>,
}

impl PayScope {
    /// A scope covering every employee of the given type.
    pub fn for_type(employee_type: EmployeeType) -> Self {
        Self {
            employee_type,
            department_id: None,
            designation_id: None,
        }
    }

    /// Returns true if an employee with these attributes falls in the scope.
    ///
    /// An unknown department or designation only matches a scope that does
    /// not narrow on it.
    pub fn matches(
        &self,
        employee_type: EmployeeType,
        department_id: Option<DepartmentId>,
        designation_id: Option<DesignationId>,
    ) -> bool {
        self.employee_type == employee_type
            && self.department_id.is_none_or(|d| Some(d) == department_id)
            && self.designation_id.is_none_or(|d| Some(d) == designation_id)
    }

    /// Number of narrowing dimensions; higher is more specific.
    pub fn specificity(&self) -> u8 {
        u8::from(self.department_id.is_some()) + u8::from(self.designation_id.is_some())
    }
}

/// A rate configuration for one scope, effective from a date.
///
/// All `*_rate` fields and the allowance percentages are expressed in
/// percent (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayParameter {
    /// Owning company.
    pub company_id: CompanyId,
    /// Employees this set applies to.
    #[serde(flatten)]
    pub scope: PayScope,
    /// Dearness allowance, percent of basic.
    pub da: Decimal,
    /// Travel allowance, percent of basic.
    pub ta: Decimal,
    /// House rent allowance, percent of basic.
    pub hra: Decimal,
    /// Special allowance, percent of basic.
    pub spall: Decimal,
    /// Medical allowance, percent of basic (ignored when a fixed amount is set).
    pub medical_all_rate: Decimal,
    /// Fixed medical allowance; overrides the rate when positive.
    #[serde(default)]
    pub medical_all_fixed: Decimal,
    /// Employee Provident Fund, percent of basic.
    pub epf_rate: Decimal,
    /// Employee State Insurance, percent of gross.
    pub esi_rate: Decimal,
    /// Tax deducted at source, percent of gross.
    pub tds_rate: Decimal,
    /// Professional tax, percent of gross.
    pub professional_tax_rate: Decimal,
    /// Basic salary above which EPF is not deducted.
    #[serde(default = "default_epf_salary_limit")]
    pub epf_salary_limit: Decimal,
    /// Gross salary above which ESI is not deducted.
    #[serde(default = "default_esi_salary_limit")]
    pub esi_salary_limit: Decimal,
    /// Leave days per month that are paid.
    #[serde(default = "default_paid_leave_per_month")]
    pub paid_leave_per_month: Decimal,
    /// Amount deducted per unpaid leave day.
    #[serde(default)]
    pub unpaid_leave_penalty_per_day: Decimal,
    /// Date from which this set applies.
    pub effective_date: NaiveDate,
}

impl PayParameter {
    /// Checks every percentage is within 0-100 and every amount is non-negative.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{EmployeeType, PayParameter, PayScope};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let mut parameter = PayParameter::zero_rated(
    ///     1,
    ///     PayScope::for_type(EmployeeType::Permanent),
    ///     NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
    /// );
    /// assert!(parameter.validate().is_ok());
    ///
    /// parameter.hra = Decimal::new(101, 0);
    /// assert!(parameter.validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        let percentages = [
            ("da", self.da),
            ("ta", self.ta),
            ("hra", self.hra),
            ("spall", self.spall),
            ("medical_all_rate", self.medical_all_rate),
            ("epf_rate", self.epf_rate),
            ("esi_rate", self.esi_rate),
            ("tds_rate", self.tds_rate),
            ("professional_tax_rate", self.professional_tax_rate),
        ];
        for (field, value) in percentages {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(EngineError::validation(
                    field,
                    format!("{} must be between 0 and 100", value),
                ));
            }
        }

        let amounts = [
            ("medical_all_fixed", self.medical_all_fixed),
            ("epf_salary_limit", self.epf_salary_limit),
            ("esi_salary_limit", self.esi_salary_limit),
            ("paid_leave_per_month", self.paid_leave_per_month),
            ("unpaid_leave_penalty_per_day", self.unpaid_leave_penalty_per_day),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(EngineError::validation(
                    field,
                    format!("{} must not be negative", value),
                ));
            }
        }

        Ok(())
    }

    /// A parameter set with every rate at zero and default thresholds.
    pub fn zero_rated(company_id: CompanyId, scope: PayScope, effective_date: NaiveDate) -> Self {
        Self {
            company_id,
            scope,
            da: Decimal::ZERO,
            ta: Decimal::ZERO,
            hra: Decimal::ZERO,
            spall: Decimal::ZERO,
            medical_all_rate: Decimal::ZERO,
            medical_all_fixed: Decimal::ZERO,
            epf_rate: Decimal::ZERO,
            esi_rate: Decimal::ZERO,
            tds_rate: Decimal::ZERO,
            professional_tax_rate: Decimal::ZERO,
            epf_salary_limit: default_epf_salary_limit(),
            esi_salary_limit: default_esi_salary_limit(),
            paid_leave_per_month: default_paid_leave_per_month(),
            unpaid_leave_penalty_per_day: Decimal::ZERO,
            effective_date,
        }
    }
}
