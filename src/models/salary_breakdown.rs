//! Salary breakdown models.
//!
//! This module contains the [`SalaryBreakdown`] produced by the salary
//! component calculator together with the audit types that record how each
//! component was derived.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EmployeeType;

/// Warning code attached to breakdowns and records whose net salary is negative.
pub const NEGATIVE_NET_SALARY: &str = "NEGATIVE_NET_SALARY";

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't prevent a record from being
/// produced but require an operator's attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// The warning raised when deductions exceed gross salary.
    pub fn negative_net_salary(net_salary: Decimal) -> Self {
        Self {
            code: NEGATIVE_NET_SALARY.to_string(),
            message: format!(
                "Net salary is negative ({}); deductions exceed gross salary",
                net_salary.normalize()
            ),
            severity: "high".to_string(),
        }
    }
}

/// The full, unrounded component breakdown for one employee and period.
///
/// Values are exact decimal results of the salary formulas; rounding to
/// currency precision happens only when the breakdown becomes a
/// [`PayMaster`](super::PayMaster).
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_salary_components;
/// use payroll_engine::models::{EmployeeType, PayParameter, PayScope};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let mut parameter = PayParameter::zero_rated(
///     1,
///     PayScope::for_type(EmployeeType::Permanent),
///     NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
/// );
/// parameter.hra = Decimal::new(20, 0);
///
/// let breakdown = calculate_salary_components(
///     Decimal::new(20000, 0),
///     &parameter,
///     EmployeeType::Permanent,
///     Decimal::ZERO,
/// )
/// .unwrap();
/// assert_eq!(breakdown.hra, Decimal::new(4000, 0));
/// assert_eq!(breakdown.gross_salary, Decimal::new(24000, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// Employee type the breakdown was computed for.
    pub employee_type: EmployeeType,
    /// The allowance multiplier applied for the employee type.
    pub type_multiplier: Decimal,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Dearness allowance.
    pub da: Decimal,
    /// Travel allowance.
    pub ta: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Special allowance.
    pub spall: Decimal,
    /// Medical allowance.
    pub medical_all: Decimal,
    /// Basic plus every allowance.
    pub gross_salary: Decimal,
    /// Employee Provident Fund deduction.
    pub epf: Decimal,
    /// Employee State Insurance deduction.
    pub esi: Decimal,
    /// Tax deducted at source.
    pub tds: Decimal,
    /// Professional tax.
    pub professional_tax: Decimal,
    /// Unpaid leave days charged in the period.
    pub unpaid_leave_days: Decimal,
    /// Deduction for unpaid leave.
    pub unpaid_leave_deduction: Decimal,
    /// Sum of every deduction.
    pub total_deductions: Decimal,
    /// Gross minus deductions; may be negative.
    pub net_salary: Decimal,
    /// Audit trail of the calculation.
    pub audit_steps: Vec<AuditStep>,
    /// Conditions flagged during the calculation.
    pub warnings: Vec<AuditWarning>,
}

impl SalaryBreakdown {
    /// Sum of the allowance components (excluding basic).
    pub fn allowance_total(&self) -> Decimal {
        self.da + self.ta + self.hra + self.spall + self.medical_all
    }

    /// Returns true if the breakdown carries a negative-net warning.
    pub fn has_negative_net(&self) -> bool {
        self.warnings.iter().any(|w| w.code == NEGATIVE_NET_SALARY)
    }
}
