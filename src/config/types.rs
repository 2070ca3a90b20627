//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PayParameter};

/// Reference rates used by the compliance report when no pay parameter
/// set resolves for a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatutoryReference {
    /// EPF rate in percent.
    pub epf_rate: Decimal,
    /// Basic salary above which EPF does not apply.
    pub epf_salary_limit: Decimal,
    /// ESI rate in percent.
    pub esi_rate: Decimal,
    /// Gross salary above which ESI does not apply.
    pub esi_salary_limit: Decimal,
}

impl Default for StatutoryReference {
    fn default() -> Self {
        Self {
            epf_rate: Decimal::new(12, 0),
            epf_salary_limit: Decimal::new(15000, 0),
            esi_rate: Decimal::new(75, 2),
            esi_salary_limit: Decimal::new(25000, 0),
        }
    }
}

/// Engine-wide settings, read from `engine.yaml`.
///
/// Every field is optional in the file and falls back to the value of
/// [`EngineSettings::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Earliest year payroll may be generated for.
    pub min_year: i32,
    /// How many years past the current one generation may target.
    pub max_years_ahead: i32,
    /// Longest trend window, in months.
    pub max_trend_months: u32,
    /// Deviation in currency units tolerated by the compliance report.
    pub compliance_tolerance: Decimal,
    /// Lowest compliant basic salary.
    pub minimum_wage: Decimal,
    /// Fallback statutory rates for the compliance report.
    pub statutory: StatutoryReference,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_year: 2023,
            max_years_ahead: 1,
            max_trend_months: 24,
            compliance_tolerance: Decimal::ONE,
            minimum_wage: Decimal::new(15000, 0),
            statutory: StatutoryReference::default(),
        }
    }
}

impl EngineSettings {
    /// Checks the settings for values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] naming the first offending field.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_years_ahead < 0 {
            return Err(EngineError::validation(
                "max_years_ahead",
                "must not be negative",
            ));
        }
        if self.max_trend_months == 0 {
            return Err(EngineError::validation(
                "max_trend_months",
                "must be at least 1",
            ));
        }
        let amounts = [
            ("compliance_tolerance", self.compliance_tolerance),
            ("minimum_wage", self.minimum_wage),
            ("statutory.epf_salary_limit", self.statutory.epf_salary_limit),
            ("statutory.esi_salary_limit", self.statutory.esi_salary_limit),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(EngineError::validation(field, "must not be negative"));
            }
        }
        for (field, value) in [
            ("statutory.epf_rate", self.statutory.epf_rate),
            ("statutory.esi_rate", self.statutory.esi_rate),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(EngineError::validation(field, "must be between 0 and 100"));
            }
        }
        Ok(())
    }

    /// Latest year payroll may be generated for, given the current year.
    pub fn max_year(&self, current_year: i32) -> i32 {
        current_year + self.max_years_ahead
    }
}

/// A file under `pay_parameters/`.
#[derive(Debug, Clone, Deserialize)]
pub struct PayParameterFile {
    /// The parameter sets defined in the file.
    pub parameters: Vec<PayParameter>,
}

/// The optional `employees.yaml` seed used by the bundled server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeSeed {
    /// Employees to load into the in-memory directory.
    #[serde(default)]
    pub employees: Vec<Employee>,
}
