//! Aggregates and compliance checks over the payroll ledger.
//!
//! The report builders in the submodules are pure functions over record
//! sets. [`PayrollAnalytics`] authorizes the caller, loads the records of
//! the company from the store and hands them to the builders. Analytics
//! only read the ledger and are independent of generation.

mod compliance;
mod cost;
mod summary;
mod trends;

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineSettings;
use crate::directory::PayParameterSource;
use crate::error::{EngineError, EngineResult};
use crate::models::{CompanyId, PayMaster, PayPeriod};
use crate::policy::{AccessPolicy, PayrollAction, authorize};
use crate::store::PayrollStore;

pub use compliance::{ComplianceCheck, ComplianceIssue, ComplianceReport, check_compliance};
pub use cost::{ComponentTotals, CostAnalysis, GroupBy, analyse_costs};
pub use summary::{AnalyticsScope, LedgerTotals, PayrollSummary, PeriodDelta, summarize_records};
pub use trends::{TrendPoint, trend_points};

/// Count and totals of one group of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Number of records.
    pub count: usize,
    /// Sum of gross salary.
    pub total_gross: Decimal,
    /// Sum of net salary.
    pub total_net: Decimal,
    /// Sum of total deductions.
    pub total_deductions: Decimal,
    /// Mean net salary, 2 dp.
    pub average_net: Decimal,
}

impl GroupSummary {
    fn add(&mut self, record: &PayMaster) {
        self.count += 1;
        self.total_gross += record.gross_salary;
        self.total_net += record.net_salary;
        self.total_deductions += record.total_deductions;
        self.average_net = average(self.total_net, self.count);
    }
}

/// Rounds a percentage to 2 dp.
fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Mean of `total` over `count` items, 2 dp; zero for no items.
fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    round_percent(total / Decimal::from(count))
}

/// Change from `previous` to `current` in percent, 2 dp.
///
/// `None` when `previous` is zero.
fn percent_change(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    Some(round_percent(
        (current - previous) / previous * Decimal::ONE_HUNDRED,
    ))
}

/// Read-only reporting over the payroll ledger.
#[derive(Clone)]
pub struct PayrollAnalytics {
    store: Arc<dyn PayrollStore>,
    parameters: Arc<dyn PayParameterSource>,
    policy: Arc<dyn AccessPolicy>,
    settings: EngineSettings,
}

impl PayrollAnalytics {
    /// Creates the reporting service.
    pub fn new(
        store: Arc<dyn PayrollStore>,
        parameters: Arc<dyn PayParameterSource>,
        policy: Arc<dyn AccessPolicy>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            store,
            parameters,
            policy,
            settings,
        }
    }

    /// Summarises one period, optionally against the previous month.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Forbidden`] if the policy denies analytics.
    pub fn summarize(
        &self,
        company_id: CompanyId,
        period: PayPeriod,
        scope: &AnalyticsScope,
        compare_with_previous: bool,
    ) -> EngineResult<PayrollSummary> {
        authorize(self.policy.as_ref(), company_id, PayrollAction::ReadAnalytics)?;

        let current = self.scoped_records(company_id, period, scope)?;
        let previous = if compare_with_previous {
            Some(self.scoped_records(company_id, period.previous(), scope)?)
        } else {
            None
        };

        let summary = summarize_records(company_id, period, &current, previous.as_deref());
        info!(
            company_id,
            month = period.month,
            year = period.year,
            employees = summary.employee_count,
            "Payroll summary built"
        );
        Ok(summary)
    }

    /// Monthly trend series of `months` months ending with `end`, oldest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Forbidden`] if the policy denies analytics and
    /// [`EngineError::Validation`] if `months` is zero or exceeds the
    /// configured maximum.
    pub fn trends(
        &self,
        company_id: CompanyId,
        end: PayPeriod,
        months: u32,
    ) -> EngineResult<Vec<TrendPoint>> {
        authorize(self.policy.as_ref(), company_id, PayrollAction::ReadAnalytics)?;
        if months == 0 || months > self.settings.max_trend_months {
            return Err(EngineError::validation(
                "months",
                format!("must be between 1 and {}", self.settings.max_trend_months),
            ));
        }

        let mut series = Vec::with_capacity(months as usize);
        for period in end.trailing(months) {
            series.push((period, self.store.records(company_id, Some(period))?));
        }
        Ok(trend_points(series))
    }

    /// Component and group cost breakdown of one period.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Forbidden`] if the policy denies analytics.
    pub fn cost_analysis(
        &self,
        company_id: CompanyId,
        period: PayPeriod,
        group_by: GroupBy,
    ) -> EngineResult<CostAnalysis> {
        authorize(self.policy.as_ref(), company_id, PayrollAction::ReadAnalytics)?;
        let records = self.store.records(company_id, Some(period))?;
        Ok(analyse_costs(period, &records, group_by))
    }

    /// Statutory compliance of one period's records.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Forbidden`] if the policy denies analytics.
    pub fn compliance_report(
        &self,
        company_id: CompanyId,
        period: PayPeriod,
    ) -> EngineResult<ComplianceReport> {
        authorize(self.policy.as_ref(), company_id, PayrollAction::ReadAnalytics)?;
        let records = self.store.records(company_id, Some(period))?;
        let parameters = self.parameters.parameters(company_id);

        let report = check_compliance(period, &records, &parameters, &self.settings);
        info!(
            company_id,
            month = period.month,
            year = period.year,
            score = %report.compliance_score,
            issues = report.issues.len(),
            "Compliance report built"
        );
        Ok(report)
    }

    fn scoped_records(
        &self,
        company_id: CompanyId,
        period: PayPeriod,
        scope: &AnalyticsScope,
    ) -> EngineResult<Vec<PayMaster>> {
        Ok(self
            .store
            .records(company_id, Some(period))?
            .into_iter()
            .filter(|r| scope.matches(r))
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::str::FromStr;

    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use crate::models::{DepartmentId, EmployeeId, EmployeeType, PayMaster};

    pub fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// An April 2025 record whose basic salary makes up the whole gross.
    pub fn record(
        employee_id: EmployeeId,
        employee_type: EmployeeType,
        department_id: DepartmentId,
        role: &str,
        gross: &str,
        deductions: &str,
    ) -> PayMaster {
        let now = Utc.with_ymd_and_hms(2025, 4, 30, 0, 0, 0).unwrap();
        PayMaster {
            id: employee_id,
            company_id: 1,
            employee_id,
            month: 4,
            year: 2025,
            employee_type,
            department_id,
            designation_id: 1,
            role: role.to_string(),
            basic_salary: dec(gross),
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
            gross_salary: dec(gross),
            total_deductions: dec(deductions),
            net_salary: dec(gross) - dec(deductions),
            remarks: None,
            warnings: vec![],
            parameters_as_of: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{dec, record};
    use super::*;
    use crate::directory::ParameterRegistry;
    use crate::models::EmployeeType;
    use crate::policy::StaticPolicy;
    use crate::store::InMemoryPayrollStore;

    fn analytics(records: Vec<PayMaster>, policy: StaticPolicy) -> PayrollAnalytics {
        let store = InMemoryPayrollStore::new();
        store.commit_batch(records).unwrap();
        PayrollAnalytics::new(
            Arc::new(store),
            Arc::new(ParameterRegistry::new()),
            Arc::new(policy),
            EngineSettings::default(),
        )
    }

    fn in_month(mut r: PayMaster, month: u32) -> PayMaster {
        r.month = month;
        r
    }

    #[test]
    fn test_average_and_percent_change() {
        assert_eq!(average(dec("10"), 3), dec("3.33"));
        assert_eq!(average(dec("10"), 0), Decimal::ZERO);
        assert_eq!(percent_change(dec("200"), dec("150")), Some(dec("-25")));
        assert_eq!(percent_change(Decimal::ZERO, dec("150")), None);
    }

    #[test]
    fn test_summary_applies_scope() {
        let analytics = analytics(
            vec![
                record(1, EmployeeType::Permanent, 10, "EMPLOYEE", "20000", "0"),
                record(2, EmployeeType::Intern, 10, "EMPLOYEE", "10000", "0"),
            ],
            StaticPolicy::allow_all(),
        );
        let scope = AnalyticsScope {
            employee_type: Some(EmployeeType::Intern),
            department_ids: None,
        };

        let summary = analytics
            .summarize(1, PayPeriod::new(4, 2025).unwrap(), &scope, true)
            .unwrap();

        assert_eq!(summary.employee_count, 1);
        assert_eq!(summary.totals.gross_salary, dec("10000"));
        let delta = summary.period_over_period_delta.unwrap();
        assert_eq!(delta.employee_count_change, 1);
    }

    #[test]
    fn test_trend_window_is_bounded() {
        let analytics = analytics(vec![], StaticPolicy::allow_all());
        let end = PayPeriod::new(4, 2025).unwrap();

        assert!(matches!(
            analytics.trends(1, end, 0),
            Err(EngineError::Validation { .. })
        ));
        assert!(matches!(
            analytics.trends(1, end, 25),
            Err(EngineError::Validation { .. })
        ));
        assert_eq!(analytics.trends(1, end, 24).unwrap().len(), 24);
    }

    #[test]
    fn test_trends_read_each_month() {
        let analytics = analytics(
            vec![
                in_month(record(1, EmployeeType::Permanent, 10, "EMPLOYEE", "20000", "0"), 2),
                in_month(record(1, EmployeeType::Permanent, 10, "EMPLOYEE", "22000", "0"), 3),
                in_month(record(1, EmployeeType::Permanent, 10, "EMPLOYEE", "22000", "0"), 4),
            ],
            StaticPolicy::allow_all(),
        );

        let points = analytics
            .trends(1, PayPeriod::new(4, 2025).unwrap(), 3)
            .unwrap();

        let periods: Vec<u32> = points.iter().map(|p| p.period.month).collect();
        assert_eq!(periods, vec![2, 3, 4]);
        assert_eq!(points[1].gross_growth_percent, Some(dec("10")));
        assert_eq!(points[2].gross_growth_percent, Some(Decimal::ZERO));
    }

    #[test]
    fn test_reports_are_tenant_scoped() {
        let mut other = record(9, EmployeeType::Permanent, 10, "EMPLOYEE", "99000", "0");
        other.company_id = 2;
        let analytics = analytics(
            vec![record(1, EmployeeType::Permanent, 10, "EMPLOYEE", "20000", "0"), other],
            StaticPolicy::allow_all(),
        );
        let april = PayPeriod::new(4, 2025).unwrap();

        let cost = analytics.cost_analysis(1, april, GroupBy::Department).unwrap();
        assert_eq!(cost.total_employees, 1);
        assert_eq!(cost.component_totals.gross_salary, dec("20000"));

        let report = analytics.compliance_report(2, april).unwrap();
        assert_eq!(report.total_employees, 1);
    }

    #[test]
    fn test_analytics_require_permission() {
        let analytics = analytics(vec![], StaticPolicy::granting([PayrollAction::ReadPayroll]));
        let april = PayPeriod::new(4, 2025).unwrap();
        assert!(matches!(
            analytics.compliance_report(1, april),
            Err(EngineError::Forbidden { .. })
        ));
        assert!(matches!(
            analytics.summarize(1, april, &AnalyticsScope::default(), false),
            Err(EngineError::Forbidden { .. })
        ));
    }
}
