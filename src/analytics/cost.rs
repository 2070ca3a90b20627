//! Cost analysis by component and by group.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{PayMaster, PayPeriod};

use super::{GroupSummary, average, round_percent};

/// The dimension a cost analysis is grouped by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Department at generation time.
    #[default]
    Department,
    /// Role at generation time.
    Role,
    /// Employee type at generation time.
    Type,
}

impl GroupBy {
    /// The group key of a record.
    fn key(self, record: &PayMaster) -> String {
        match self {
            GroupBy::Department => record.department_id.to_string(),
            GroupBy::Role => record.role.clone(),
            GroupBy::Type => record.employee_type.to_string(),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroupBy::Department => "department",
            GroupBy::Role => "role",
            GroupBy::Type => "type",
        })
    }
}

/// Sum of every earnings and deduction component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentTotals {
    /// Basic salary.
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
    /// Manual allowance.
    pub other_allowance: Decimal,
    /// Gross salary.
    pub gross_salary: Decimal,
    /// EPF.
    pub epf: Decimal,
    /// ESI.
    pub esi: Decimal,
    /// TDS.
    pub tds: Decimal,
    /// Professional tax.
    pub professional_tax: Decimal,
    /// Unpaid leave deduction.
    pub unpaid_leave_deduction: Decimal,
    /// Manual deduction.
    pub other_deductions: Decimal,
    /// Total deductions.
    pub total_deductions: Decimal,
    /// Net salary.
    pub net_salary: Decimal,
}

impl ComponentTotals {
    fn add(&mut self, r: &PayMaster) {
        self.basic_salary += r.basic_salary;
        self.da += r.da;
        self.ta += r.ta;
        self.hra += r.hra;
        self.spall += r.spall;
        self.medical_all += r.medical_all;
        self.other_allowance += r.other_allowance;
        self.gross_salary += r.gross_salary;
        self.epf += r.epf;
        self.esi += r.esi;
        self.tds += r.tds;
        self.professional_tax += r.professional_tax;
        self.unpaid_leave_deduction += r.unpaid_leave_deduction;
        self.other_deductions += r.other_deductions;
        self.total_deductions += r.total_deductions;
        self.net_salary += r.net_salary;
    }

    /// Each component except gross as a percentage of gross, 2 dp.
    ///
    /// Empty when gross is zero.
    fn percentages_of_gross(&self) -> BTreeMap<String, Decimal> {
        if self.gross_salary.is_zero() {
            return BTreeMap::new();
        }
        [
            ("basic_salary", self.basic_salary),
            ("da", self.da),
            ("ta", self.ta),
            ("hra", self.hra),
            ("spall", self.spall),
            ("medical_all", self.medical_all),
            ("other_allowance", self.other_allowance),
            ("epf", self.epf),
            ("esi", self.esi),
            ("tds", self.tds),
            ("professional_tax", self.professional_tax),
            ("unpaid_leave_deduction", self.unpaid_leave_deduction),
            ("other_deductions", self.other_deductions),
            ("total_deductions", self.total_deductions),
            ("net_salary", self.net_salary),
        ]
        .into_iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                round_percent(value / self.gross_salary * Decimal::ONE_HUNDRED),
            )
        })
        .collect()
    }
}

/// Cost breakdown of one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    /// The period analysed.
    pub period: PayPeriod,
    /// The grouping used for `grouped`.
    pub group_by: GroupBy,
    /// Component sums.
    pub component_totals: ComponentTotals,
    /// Each component as a percentage of gross.
    pub cost_percentages: BTreeMap<String, Decimal>,
    /// Totals per group key.
    pub grouped: BTreeMap<String, GroupSummary>,
    /// Number of records.
    pub total_employees: usize,
    /// Gross salary per record, 2 dp.
    pub average_cost_per_employee: Decimal,
}

/// Builds the cost analysis of one period's records.
pub fn analyse_costs(period: PayPeriod, records: &[PayMaster], group_by: GroupBy) -> CostAnalysis {
    let mut component_totals = ComponentTotals::default();
    let mut grouped: BTreeMap<String, GroupSummary> = BTreeMap::new();
    for record in records {
        component_totals.add(record);
        grouped.entry(group_by.key(record)).or_default().add(record);
    }

    CostAnalysis {
        period,
        group_by,
        cost_percentages: component_totals.percentages_of_gross(),
        average_cost_per_employee: average(component_totals.gross_salary, records.len()),
        component_totals,
        grouped,
        total_employees: records.len(),
    }
}
