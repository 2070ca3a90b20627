//! Bounded post-generation correction of a payroll record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::calculate_salary_components;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PayMaster, PayParameter, round_currency};

/// The fields an operator may change on an existing record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectionPatch {
    /// Manual allowance added on top of the calculated earnings.
    #[serde(default)]
    pub other_allowance: Option<Decimal>,
    /// Manual deduction added on top of the calculated deductions.
    #[serde(default)]
    pub other_deductions: Option<Decimal>,
    /// New basic salary; triggers a full recalculation.
    #[serde(default)]
    pub basic_salary: Option<Decimal>,
    /// Operator remarks.
    #[serde(default)]
    pub remarks: Option<String>,
}

impl CorrectionPatch {
    /// Checks the amounts before anything is touched.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] for a negative manual amount or
    /// a basic salary that is not positive.
    pub fn validate(&self) -> EngineResult<()> {
        if let Some(amount) = self.other_allowance {
            if amount < Decimal::ZERO {
                return Err(EngineError::validation(
                    "other_allowance",
                    "must not be negative",
                ));
            }
        }
        if let Some(amount) = self.other_deductions {
            if amount < Decimal::ZERO {
                return Err(EngineError::validation(
                    "other_deductions",
                    "must not be negative",
                ));
            }
        }
        if let Some(basic) = self.basic_salary {
            if basic <= Decimal::ZERO {
                return Err(EngineError::validation(
                    "basic_salary",
                    "must be greater than zero",
                ));
            }
        }
        Ok(())
    }

    /// Returns true if the patch requires recalculating the components.
    pub fn recalculates(&self) -> bool {
        self.basic_salary.is_some()
    }
}

/// Applies a correction to a copy of `record`.
///
/// A new basic salary recomputes every percentage-derived component with
/// `parameter`, the set resolved for the employee's current attributes as
/// of `now`, and re-applies the unpaid leave days recorded on the row; the
/// record's snapshot and resolution date are refreshed. Neither is consulted when the
/// patch carries no basic salary. Manual amounts replace the previous manual
/// amounts without touching the statutory components. The employee and
/// period of the record never change.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] for an invalid patch. When a
/// recalculation is needed, returns [`EngineError::NotFound`] without a
/// current employee and [`EngineError::ConfigurationMissing`] without a
/// resolved parameter set.
pub fn apply_correction(
    record: &PayMaster,
    patch: &CorrectionPatch,
    employee: Option<&Employee>,
    parameter: Option<&PayParameter>,
    now: DateTime<Utc>,
) -> EngineResult<PayMaster> {
    patch.validate()?;

    let mut corrected = record.clone();

    if let Some(basic) = patch.basic_salary {
        let employee = employee.ok_or_else(|| EngineError::NotFound {
            entity: "Employee".to_string(),
            id: record.employee_id.to_string(),
        })?;
        let parameter = parameter.ok_or(EngineError::ConfigurationMissing {
            employee_id: employee.id,
            employee_type: employee.employee_type,
        })?;
        let breakdown = calculate_salary_components(
            basic,
            parameter,
            employee.employee_type,
            record.unpaid_leave_days,
        )?;
        corrected.department_id = employee.department_id;
        corrected.designation_id = employee.designation_id;
        corrected.role = employee.role.clone();
        corrected.parameters_as_of = Some(now.date_naive());
        corrected.apply_components(&breakdown);
    }

    if let Some(amount) = patch.other_allowance {
        corrected.other_allowance = round_currency(amount);
    }
    if let Some(amount) = patch.other_deductions {
        corrected.other_deductions = round_currency(amount);
    }
    if let Some(remarks) = &patch.remarks {
        corrected.remarks = Some(remarks.clone());
    }

    corrected.recompute_totals();
    corrected.updated_at = now;
    Ok(corrected)
}
