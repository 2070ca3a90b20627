//! Employee model and related types.
//!
//! This module defines the [`Employee`] record read from the employee
//! directory and the closed [`EmployeeType`] enum with its allowance
//! multiplier table.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a tenant company.
pub type CompanyId = u64;
/// Identifier of an employee.
pub type EmployeeId = u64;
/// Identifier of a department.
pub type DepartmentId = u64;
/// Identifier of a designation.
pub type DesignationId = u64;

/// The employment category of an employee.
///
/// Non-permanent categories are not given separate parameter sets for their
/// allowances; instead every allowance is prorated by [`EmployeeType::multiplier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeType {
    /// Permanent staff.
    Permanent,
    /// Fixed-term contract staff.
    Contract,
    /// Interns.
    Intern,
    /// External consultants.
    Consultant,
    /// Part-time staff.
    PartTime,
    /// Temporary staff.
    Temporary,
}

impl EmployeeType {
    /// All employee types, in declaration order.
    pub const ALL: [EmployeeType; 6] = [
        EmployeeType::Permanent,
        EmployeeType::Contract,
        EmployeeType::Intern,
        EmployeeType::Consultant,
        EmployeeType::PartTime,
        EmployeeType::Temporary,
    ];

    /// Returns the scale applied to every allowance component for this type.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::EmployeeType;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(EmployeeType::Permanent.multiplier(), Decimal::ONE);
    /// assert_eq!(EmployeeType::Intern.multiplier(), Decimal::new(5, 1));
    /// ```
    pub fn multiplier(self) -> Decimal {
        match self {
            EmployeeType::Permanent => Decimal::new(10, 1),
            EmployeeType::Contract => Decimal::new(8, 1),
            EmployeeType::Intern => Decimal::new(5, 1),
            EmployeeType::Consultant => Decimal::new(9, 1),
            EmployeeType::PartTime => Decimal::new(6, 1),
            EmployeeType::Temporary => Decimal::new(7, 1),
        }
    }

    /// Returns true if EPF and ESI apply to this type.
    pub fn has_statutory_contributions(self) -> bool {
        matches!(self, EmployeeType::Permanent | EmployeeType::Contract)
    }

    /// Returns the wire name of the type (e.g. `PART_TIME`).
    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeType::Permanent => "PERMANENT",
            EmployeeType::Contract => "CONTRACT",
            EmployeeType::Intern => "INTERN",
            EmployeeType::Consultant => "CONSULTANT",
            EmployeeType::PartTime => "PART_TIME",
            EmployeeType::Temporary => "TEMPORARY",
        }
    }
}

impl fmt::Display for EmployeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An employee as provided by the employee-management collaborator.
///
/// The payroll core only ever reads employees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: EmployeeId,
    /// The tenant the employee belongs to.
    pub company_id: CompanyId,
    /// Human-facing employee code (e.g. "EMP-0042").
    pub employee_code: String,
    /// Display name.
    pub name: String,
    /// Address payslips are sent to, if any.
    #[serde(default)]
    pub email: Option<String>,
    /// Organisational role (e.g. "MANAGER").
    pub role: String,
    /// Employment category.
    #[serde(rename = "type")]
    pub employee_type: EmployeeType,
    /// Department the employee belongs to.
    pub department_id: DepartmentId,
    /// Designation the employee holds.
    pub designation_id: DesignationId,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Whether the employee is currently active.
    pub is_active: bool,
}
