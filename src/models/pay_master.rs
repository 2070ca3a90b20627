//! Payroll record model.
//!
//! A [`PayMaster`] is one persisted payroll row: one employee, one period.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{
    AuditWarning, CompanyId, DepartmentId, DesignationId, Employee, EmployeeId, EmployeeType,
    PayPeriod, SalaryBreakdown, NEGATIVE_NET_SALARY,
};

/// Identifier of a payroll record.
pub type PayMasterId = u64;

/// Rounds an amount to currency precision (2 dp, midpoint away from zero).
///
/// # Example
///
/// ```
/// use payroll_engine::models::round_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_currency(Decimal::new(1234565, 4)), Decimal::new(12346, 2));
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A persisted payroll record.
///
/// Invariants maintained by [`PayMaster::recompute_totals`]:
/// `gross_salary` is the sum of the earnings components,
/// `total_deductions` is the sum of the deduction components and
/// `net_salary = gross_salary - total_deductions`. A negative net salary is
/// flagged in `warnings`, never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayMaster {
    /// Record identifier, assigned by the store on commit.
    pub id: PayMasterId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Employee the record belongs to.
    pub employee_id: EmployeeId,
    /// Period month.
    pub month: u32,
    /// Period year.
    pub year: i32,
    /// Employee type at generation time.
    pub employee_type: EmployeeType,
    /// Department at generation time.
    pub department_id: DepartmentId,
    /// Designation at generation time.
    pub designation_id: DesignationId,
    /// Role at generation time.
    pub role: String,
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
    /// Manual allowance added through correction.
    pub other_allowance: Decimal,
    /// Employee Provident Fund deduction.
    pub epf: Decimal,
    /// Employee State Insurance deduction.
    pub esi: Decimal,
    /// Tax deducted at source.
    pub tds: Decimal,
    /// Professional tax.
    pub professional_tax: Decimal,
    /// Unpaid leave days charged.
    pub unpaid_leave_days: Decimal,
    /// Deduction for unpaid leave.
    pub unpaid_leave_deduction: Decimal,
    /// Manual deduction added through correction.
    pub other_deductions: Decimal,
    /// Sum of earnings components.
    pub gross_salary: Decimal,
    /// Sum of deduction components.
    pub total_deductions: Decimal,
    /// Gross minus deductions.
    pub net_salary: Decimal,
    /// Free-form operator remarks.
    pub remarks: Option<String>,
    /// Flags raised on the record.
    #[serde(default)]
    pub warnings: Vec<AuditWarning>,
    /// Date the pay parameters were last resolved for this record.
    ///
    /// `None` means the last day of the period.
    #[serde(default)]
    pub parameters_as_of: Option<NaiveDate>,
    /// When the record was generated.
    pub created_at: DateTime<Utc>,
    /// When the record was last changed.
    pub updated_at: DateTime<Utc>,
}

impl PayMaster {
    /// Builds an unsaved record from a calculator breakdown.
    ///
    /// Components are rounded to currency precision and totals are then
    /// recomputed from the rounded values.
    pub fn from_breakdown(
        employee: &Employee,
        period: PayPeriod,
        breakdown: &SalaryBreakdown,
        remarks: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut record = Self {
            id: 0,
            company_id: employee.company_id,
            employee_id: employee.id,
            month: period.month,
            year: period.year,
            employee_type: breakdown.employee_type,
            department_id: employee.department_id,
            designation_id: employee.designation_id,
            role: employee.role.clone(),
            basic_salary: Decimal::ZERO,
            da: Decimal::ZERO,
            ta: Decimal::ZERO,
            hra: Decimal::ZERO,
            spall: Decimal::ZERO,
            medical_all: Decimal::ZERO,
            other_allowance: Decimal::ZERO,
            epf: Decimal::ZERO,
            esi: Decimal::ZERO,
            tds: Decimal::ZERO,
            professional_tax: Decimal::ZERO,
            unpaid_leave_days: Decimal::ZERO,
            unpaid_leave_deduction: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
            gross_salary: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            net_salary: Decimal::ZERO,
            remarks,
            warnings: Vec::new(),
            parameters_as_of: Some(period.last_day()),
            created_at: now,
            updated_at: now,
        };
        record.apply_components(breakdown);
        record
    }

    /// Replaces every calculated component with the rounded values of
    /// `breakdown` and recomputes totals. Manual allowance and deduction
    /// amounts are kept.
    pub fn apply_components(&mut self, breakdown: &SalaryBreakdown) {
        self.employee_type = breakdown.employee_type;
        self.basic_salary = round_currency(breakdown.basic_salary);
        self.da = round_currency(breakdown.da);
        self.ta = round_currency(breakdown.ta);
        self.hra = round_currency(breakdown.hra);
        self.spall = round_currency(breakdown.spall);
        self.medical_all = round_currency(breakdown.medical_all);
        self.epf = round_currency(breakdown.epf);
        self.esi = round_currency(breakdown.esi);
        self.tds = round_currency(breakdown.tds);
        self.professional_tax = round_currency(breakdown.professional_tax);
        self.unpaid_leave_days = breakdown.unpaid_leave_days;
        self.unpaid_leave_deduction = round_currency(breakdown.unpaid_leave_deduction);
        self.recompute_totals();
    }

    /// Recomputes gross, total deductions and net from the components and
    /// refreshes the negative-net flag.
    pub fn recompute_totals(&mut self) {
        self.gross_salary = self.statutory_gross() + self.other_allowance;
        self.total_deductions = self.epf
            + self.esi
            + self.tds
            + self.professional_tax
            + self.unpaid_leave_deduction
            + self.other_deductions;
        self.net_salary = self.gross_salary - self.total_deductions;

        self.warnings.retain(|w| w.code != NEGATIVE_NET_SALARY);
        if self.net_salary < Decimal::ZERO {
            self.warnings
                .push(AuditWarning::negative_net_salary(self.net_salary));
        }
    }

    /// Gross salary as computed by the calculator, excluding manual allowance.
    pub fn statutory_gross(&self) -> Decimal {
        self.basic_salary + self.da + self.ta + self.hra + self.spall + self.medical_all
    }

    /// The date whose pay parameters produced the current components.
    pub fn resolution_date(&self) -> NaiveDate {
        self.parameters_as_of
            .unwrap_or_else(|| self.period().last_day())
    }

    /// The period this record belongs to.
    pub fn period(&self) -> PayPeriod {
        PayPeriod {
            year: self.year,
            month: self.month,
        }
    }
}
