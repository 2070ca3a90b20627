//! Period summary.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CompanyId, DepartmentId, EmployeeType, PayMaster, PayPeriod};

use super::{GroupSummary, average, percent_change};

/// Restricts a summary to part of the ledger.
///
/// Both dimensions apply to the snapshot taken at generation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsScope {
    /// Only records of this employee type.
    #[serde(default)]
    pub employee_type: Option<EmployeeType>,
    /// Only records of these departments.
    #[serde(default)]
    pub department_ids: Option<Vec<DepartmentId>>,
}

impl AnalyticsScope {
    /// Returns true if the record falls in the scope.
    pub fn matches(&self, record: &PayMaster) -> bool {
        self.employee_type.is_none_or(|t| t == record.employee_type)
            && self
                .department_ids
                .as_ref()
                .is_none_or(|ids| ids.contains(&record.department_id))
    }
}

/// Sums of the main ledger columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerTotals {
    /// Sum of basic salary.
    pub basic_salary: Decimal,
    /// Sum of gross salary.
    pub gross_salary: Decimal,
    /// Sum of total deductions.
    pub total_deductions: Decimal,
    /// Sum of net salary.
    pub net_salary: Decimal,
    /// Sum of EPF.
    pub epf: Decimal,
    /// Sum of ESI.
    pub esi: Decimal,
    /// Sum of TDS.
    pub tds: Decimal,
    /// Sum of professional tax.
    pub professional_tax: Decimal,
    /// Sum of manual allowances.
    pub other_allowance: Decimal,
    /// Sum of manual deductions.
    pub other_deductions: Decimal,
}

impl LedgerTotals {
    /// Sums the given records.
    pub fn of<'a>(records: impl IntoIterator<Item = &'a PayMaster>) -> Self {
        let mut totals = Self::default();
        for r in records {
            totals.basic_salary += r.basic_salary;
            totals.gross_salary += r.gross_salary;
            totals.total_deductions += r.total_deductions;
            totals.net_salary += r.net_salary;
            totals.epf += r.epf;
            totals.esi += r.esi;
            totals.tds += r.tds;
            totals.professional_tax += r.professional_tax;
            totals.other_allowance += r.other_allowance;
            totals.other_deductions += r.other_deductions;
        }
        totals
    }
}

/// Change against the previous calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodDelta {
    /// The period compared against.
    pub previous_period: PayPeriod,
    /// Gross change in percent; absent when the previous gross is zero.
    pub gross_change_percent: Option<Decimal>,
    /// Net change in percent; absent when the previous net is zero.
    pub net_change_percent: Option<Decimal>,
    /// Difference in number of records.
    pub employee_count_change: i64,
}

/// Aggregates of one company's payroll for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// The company summarised.
    pub company_id: CompanyId,
    /// The period summarised.
    pub period: PayPeriod,
    /// Number of records in scope.
    pub employee_count: usize,
    /// Column sums.
    pub totals: LedgerTotals,
    /// Mean gross salary, 2 dp.
    pub average_gross: Decimal,
    /// Mean net salary, 2 dp.
    pub average_net: Decimal,
    /// Lowest net salary; absent when the period is empty.
    pub min_net: Option<Decimal>,
    /// Highest net salary; absent when the period is empty.
    pub max_net: Option<Decimal>,
    /// Breakdown by department at generation time.
    pub by_department: BTreeMap<DepartmentId, GroupSummary>,
    /// Breakdown by role at generation time.
    pub by_role: BTreeMap<String, GroupSummary>,
    /// Breakdown by employee type at generation time.
    pub by_type: BTreeMap<EmployeeType, GroupSummary>,
    /// Present when a comparison with the previous month was requested.
    pub period_over_period_delta: Option<PeriodDelta>,
}

/// Builds the summary of `current`, comparing with `previous` when given.
///
/// Both record sets must already be restricted to the company, period and
/// scope being summarised.
pub fn summarize_records(
    company_id: CompanyId,
    period: PayPeriod,
    current: &[PayMaster],
    previous: Option<&[PayMaster]>,
) -> PayrollSummary {
    let totals = LedgerTotals::of(current);
    let count = current.len();

    let mut by_department: BTreeMap<DepartmentId, GroupSummary> = BTreeMap::new();
    let mut by_role: BTreeMap<String, GroupSummary> = BTreeMap::new();
    let mut by_type: BTreeMap<EmployeeType, GroupSummary> = BTreeMap::new();
    for record in current {
        by_department
            .entry(record.department_id)
            .or_default()
            .add(record);
        by_role.entry(record.role.clone()).or_default().add(record);
        by_type.entry(record.employee_type).or_default().add(record);
    }

    let period_over_period_delta = previous.map(|previous| {
        let before = LedgerTotals::of(previous);
        PeriodDelta {
            previous_period: period.previous(),
            gross_change_percent: percent_change(before.gross_salary, totals.gross_salary),
            net_change_percent: percent_change(before.net_salary, totals.net_salary),
            employee_count_change: count as i64 - previous.len() as i64,
        }
    });

    PayrollSummary {
        company_id,
        period,
        employee_count: count,
        average_gross: average(totals.gross_salary, count),
        average_net: average(totals.net_salary, count),
        min_net: current.iter().map(|r| r.net_salary).min(),
        max_net: current.iter().map(|r| r.net_salary).max(),
        totals,
        by_department,
        by_role,
        by_type,
        period_over_period_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{dec, record};

    #[test]
    fn test_summary_totals_and_extremes() {
        let records = vec![
            record(1, EmployeeType::Permanent, 10, "MANAGER", "30000", "3000"),
            record(2, EmployeeType::Permanent, 10, "EMPLOYEE", "20000", "1000"),
            record(3, EmployeeType::Intern, 20, "EMPLOYEE", "10000", "0"),
        ];
        let period = PayPeriod::new(4, 2025).unwrap();

        let summary = summarize_records(1, period, &records, None);

        assert_eq!(summary.employee_count, 3);
        assert_eq!(summary.totals.gross_salary, dec("60000"));
        assert_eq!(summary.totals.net_salary, dec("56000"));
        assert_eq!(summary.average_gross, dec("20000"));
        assert_eq!(summary.average_net, dec("18666.67"));
        assert_eq!(summary.min_net, Some(dec("10000")));
        assert_eq!(summary.max_net, Some(dec("27000")));
        assert!(summary.period_over_period_delta.is_none());
    }

    #[test]
    fn test_summary_groups() {
        let records = vec![
            record(1, EmployeeType::Permanent, 10, "MANAGER", "30000", "3000"),
            record(2, EmployeeType::Permanent, 10, "EMPLOYEE", "20000", "1000"),
            record(3, EmployeeType::Intern, 20, "EMPLOYEE", "10000", "0"),
        ];
        let summary = summarize_records(1, PayPeriod::new(4, 2025).unwrap(), &records, None);

        let engineering = &summary.by_department[&10];
        assert_eq!(engineering.count, 2);
        assert_eq!(engineering.total_gross, dec("50000"));
        assert_eq!(engineering.total_deductions, dec("4000"));
        assert_eq!(engineering.average_net, dec("23000"));

        assert_eq!(summary.by_role["EMPLOYEE"].count, 2);
        assert_eq!(summary.by_type[&EmployeeType::Intern].total_net, dec("10000"));
    }

    #[test]
    fn test_delta_against_previous_month() {
        let current = vec![
            record(1, EmployeeType::Permanent, 10, "EMPLOYEE", "33000", "0"),
            record(2, EmployeeType::Permanent, 10, "EMPLOYEE", "22000", "0"),
        ];
        let previous = vec![record(1, EmployeeType::Permanent, 10, "EMPLOYEE", "50000", "0")];

        let summary = summarize_records(
            1,
            PayPeriod::new(1, 2025).unwrap(),
            &current,
            Some(previous.as_slice()),
        );

        let delta = summary.period_over_period_delta.unwrap();
        assert_eq!(delta.previous_period, PayPeriod::new(12, 2024).unwrap());
        assert_eq!(delta.gross_change_percent, Some(dec("10")));
        assert_eq!(delta.net_change_percent, Some(dec("10")));
        assert_eq!(delta.employee_count_change, 1);
    }

    #[test]
    fn test_delta_with_empty_previous_month() {
        let current = vec![record(1, EmployeeType::Permanent, 10, "EMPLOYEE", "20000", "0")];
        let summary =
            summarize_records(1, PayPeriod::new(4, 2025).unwrap(), &current, Some(&[][..]));

        let delta = summary.period_over_period_delta.unwrap();
        assert_eq!(delta.gross_change_percent, None);
        assert_eq!(delta.employee_count_change, 1);
    }

    #[test]
    fn test_empty_period() {
        let summary = summarize_records(1, PayPeriod::new(4, 2025).unwrap(), &[], None);
        assert_eq!(summary.employee_count, 0);
        assert_eq!(summary.average_net, Decimal::ZERO);
        assert_eq!(summary.min_net, None);
    }

    #[test]
    fn test_scope_matches_snapshot() {
        let r = record(1, EmployeeType::Contract, 20, "EMPLOYEE", "20000", "0");
        assert!(AnalyticsScope::default().matches(&r));
        let scope = AnalyticsScope {
            employee_type: Some(EmployeeType::Contract),
            department_ids: Some(vec![10]),
        };
        assert!(!scope.matches(&r));
    }
}
