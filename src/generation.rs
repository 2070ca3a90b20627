//! Payroll generation and correction.
//!
//! [`PayrollCoordinator`] runs one company's payroll for one period:
//! it selects eligible employees, rejects the run if any of them already
//! has a record for the period, resolves parameters and calculates every
//! employee, commits all rows in one batch and finally dispatches payslips.
//! It also owns the correction and listing paths, which share its
//! collaborators.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculation::calculate_salary_components;
use crate::config::EngineSettings;
use crate::directory::{EmployeeDirectory, PayParameterSource};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CompanyId, DepartmentId, Employee, EmployeeId, EmployeeType, PayMaster, PayMasterId, PayPeriod,
};
use crate::notification::{DispatchSummary, Payslip, PayslipNotifier, dispatch_payslips};
use crate::policy::{AccessPolicy, PayrollAction, authorize};
use crate::store::{
    CorrectionPatch, Pagination, PayrollFilter, PayrollPage, PayrollStore, apply_correction,
    paginate,
};

/// Narrows the employees a generation run covers.
///
/// Every dimension that is set must match; an empty filter selects every
/// active employee of the company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationFilter {
    /// Only employees of this type.
    #[serde(default)]
    pub employee_type: Option<EmployeeType>,
    /// Only employees of these departments.
    #[serde(default)]
    pub department_ids: Option<Vec<DepartmentId>>,
    /// Only these employees.
    #[serde(default)]
    pub employee_ids: Option<Vec<EmployeeId>>,
}

impl GenerationFilter {
    /// Returns true if the employee passes every dimension that is set.
    pub fn matches(&self, employee: &Employee) -> bool {
        self.employee_type
            .is_none_or(|t| t == employee.employee_type)
            && self
                .department_ids
                .as_ref()
                .is_none_or(|ids| ids.contains(&employee.department_id))
            && self
                .employee_ids
                .as_ref()
                .is_none_or(|ids| ids.contains(&employee.id))
    }
}

/// Why an employee produced no record in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    /// The employee's basic salary is zero or negative.
    InvalidBasicSalary,
    /// No pay parameter set resolved for the employee.
    ConfigurationMissing,
    /// The calculator rejected the employee's inputs.
    CalculationFailed,
}

/// An employee left out of a run, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEmployee {
    /// The employee skipped.
    pub employee_id: EmployeeId,
    /// The reason category.
    pub reason: SkipReason,
    /// A human-readable explanation.
    pub message: String,
}

/// The result of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// The period generated.
    pub period: PayPeriod,
    /// Records committed by the run.
    pub created: Vec<PayMaster>,
    /// Employees that produced no record.
    pub skipped: Vec<SkippedEmployee>,
    /// Payslip dispatch counts.
    pub payslips: DispatchSummary,
}

/// Orchestrates payroll generation, correction and listing for all tenants.
#[derive(Clone)]
pub struct PayrollCoordinator {
    directory: Arc<dyn EmployeeDirectory>,
    parameters: Arc<dyn PayParameterSource>,
    store: Arc<dyn PayrollStore>,
    policy: Arc<dyn AccessPolicy>,
    notifier: Arc<dyn PayslipNotifier>,
    settings: EngineSettings,
}

impl PayrollCoordinator {
    /// Creates a coordinator over the given collaborators.
    pub fn new(
        directory: Arc<dyn EmployeeDirectory>,
        parameters: Arc<dyn PayParameterSource>,
        store: Arc<dyn PayrollStore>,
        policy: Arc<dyn AccessPolicy>,
        notifier: Arc<dyn PayslipNotifier>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            directory,
            parameters,
            store,
            policy,
            notifier,
            settings,
        }
    }

    /// The engine settings in effect.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The payroll ledger.
    pub fn store(&self) -> &Arc<dyn PayrollStore> {
        &self.store
    }

    /// The pay parameter source.
    pub fn parameters(&self) -> &Arc<dyn PayParameterSource> {
        &self.parameters
    }

    /// The access policy.
    pub fn policy(&self) -> &Arc<dyn AccessPolicy> {
        &self.policy
    }

    /// Generates payroll for one company and period.
    ///
    /// The run is all-or-nothing at the batch level: if any selected
    /// employee already has a record for the period the whole run is
    /// rejected before anything is calculated, and all rows are committed
    /// in a single store call. Problems with individual employees are
    /// reported in [`GenerationOutcome::skipped`] without aborting the run.
    ///
    /// Payslips are dispatched after the commit; delivery failures are
    /// counted, never returned.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Forbidden`] if the policy denies generation
    /// - [`EngineError::Validation`] for a period outside the allowed range
    /// - [`EngineError::NoEligibleEmployees`] if the filter selects nobody
    /// - [`EngineError::DuplicatePeriod`] if records already exist
    /// - [`EngineError::Persistence`] if the commit failed; nothing was written
    pub async fn generate(
        &self,
        company_id: CompanyId,
        period: PayPeriod,
        filter: &GenerationFilter,
    ) -> EngineResult<GenerationOutcome> {
        authorize(self.policy.as_ref(), company_id, PayrollAction::GeneratePayroll)?;

        let period = PayPeriod::new(period.month, period.year)?;
        period.ensure_year_within(
            self.settings.min_year,
            self.settings.max_year(Utc::now().year()),
        )?;

        let eligible: Vec<Employee> = self
            .directory
            .employees(company_id)
            .into_iter()
            .filter(|e| e.is_active && filter.matches(e))
            .collect();
        if eligible.is_empty() {
            return Err(EngineError::NoEligibleEmployees { company_id });
        }

        let employee_ids: Vec<EmployeeId> = eligible.iter().map(|e| e.id).collect();
        let existing = self
            .store
            .count_existing(company_id, period, &employee_ids)?;
        if existing > 0 {
            warn!(
                company_id,
                month = period.month,
                year = period.year,
                existing,
                "Payroll already generated for period"
            );
            return Err(EngineError::DuplicatePeriod {
                month: period.month,
                year: period.year,
                existing,
            });
        }

        info!(
            company_id,
            month = period.month,
            year = period.year,
            eligible = eligible.len(),
            "Generating payroll"
        );

        let now = Utc::now();
        let mut staged = Vec::with_capacity(eligible.len());
        let mut skipped = Vec::new();
        for employee in &eligible {
            match self.calculate_record(employee, period, now) {
                Ok(record) => staged.push(record),
                Err(skip) => {
                    debug!(
                        employee_id = skip.employee_id,
                        reason = ?skip.reason,
                        "Skipping employee"
                    );
                    skipped.push(skip);
                }
            }
        }

        let created = if staged.is_empty() {
            Vec::new()
        } else {
            self.store.commit_batch(staged).inspect_err(|error| {
                warn!(
                    company_id,
                    month = period.month,
                    year = period.year,
                    error = %error,
                    "Payroll batch rolled back"
                );
            })?
        };

        let by_id: HashMap<EmployeeId, &Employee> = eligible.iter().map(|e| (e.id, e)).collect();
        let payslips: Vec<Payslip> = created
            .iter()
            .filter_map(|record| {
                by_id
                    .get(&record.employee_id)
                    .map(|employee| Payslip::new(record, employee))
            })
            .collect();
        let payslips = dispatch_payslips(Arc::clone(&self.notifier), payslips).await;

        info!(
            company_id,
            month = period.month,
            year = period.year,
            created = created.len(),
            skipped = skipped.len(),
            payslips_sent = payslips.sent,
            payslips_failed = payslips.failed,
            "Payroll generated"
        );

        Ok(GenerationOutcome {
            period,
            created,
            skipped,
            payslips,
        })
    }

    /// Calculates one employee's record, or the reason it was skipped.
    fn calculate_record(
        &self,
        employee: &Employee,
        period: PayPeriod,
        now: DateTime<Utc>,
    ) -> Result<PayMaster, SkippedEmployee> {
        let skip = |reason, message: String| SkippedEmployee {
            employee_id: employee.id,
            reason,
            message,
        };

        if employee.basic_salary <= Decimal::ZERO {
            return Err(skip(
                SkipReason::InvalidBasicSalary,
                format!("basic salary {} is not positive", employee.basic_salary),
            ));
        }

        let parameter = self
            .parameters
            .resolve(
                employee.company_id,
                employee.employee_type,
                Some(employee.department_id),
                Some(employee.designation_id),
                period.last_day(),
            )
            .ok_or_else(|| {
                let error = EngineError::ConfigurationMissing {
                    employee_id: employee.id,
                    employee_type: employee.employee_type,
                };
                skip(SkipReason::ConfigurationMissing, error.to_string())
            })?;

        let taken = self
            .directory
            .leave_days_taken(employee.company_id, employee.id, period);
        let unpaid_leave_days = (taken - parameter.paid_leave_per_month).max(Decimal::ZERO);

        let breakdown = calculate_salary_components(
            employee.basic_salary,
            &parameter,
            employee.employee_type,
            unpaid_leave_days,
        )
        .map_err(|error| skip(SkipReason::CalculationFailed, error.to_string()))?;

        Ok(PayMaster::from_breakdown(
            employee, period, &breakdown, None, now,
        ))
    }

    /// Corrects a record as of now. See [`PayrollCoordinator::update_as_of`].
    pub fn update(
        &self,
        company_id: CompanyId,
        pay_master_id: PayMasterId,
        patch: &CorrectionPatch,
    ) -> EngineResult<PayMaster> {
        self.update_as_of(company_id, pay_master_id, patch, Utc::now())
    }

    /// Corrects a record, resolving parameters as of `as_of`.
    ///
    /// A new basic salary re-resolves the employee's current parameter set
    /// and recomputes every component; manual amounts and remarks are
    /// applied on top. The record keeps its employee and period.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Forbidden`] if the policy denies updates
    /// - [`EngineError::Validation`] for negative amounts or a basic salary
    ///   that is not positive
    /// - [`EngineError::NotFound`] if the record does not exist in the company
    /// - [`EngineError::ConfigurationMissing`] if a recalculation is needed and
    ///   no parameter set resolves
    pub fn update_as_of(
        &self,
        company_id: CompanyId,
        pay_master_id: PayMasterId,
        patch: &CorrectionPatch,
        as_of: DateTime<Utc>,
    ) -> EngineResult<PayMaster> {
        authorize(self.policy.as_ref(), company_id, PayrollAction::UpdatePayroll)?;
        patch.validate()?;

        let record = self
            .store
            .get(company_id, pay_master_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "PayMaster".to_string(),
                id: pay_master_id.to_string(),
            })?;

        let (employee, parameter) = if patch.recalculates() {
            let employee = self.directory.employee(company_id, record.employee_id);
            let parameter = employee.as_ref().and_then(|e| {
                self.parameters.resolve(
                    company_id,
                    e.employee_type,
                    Some(e.department_id),
                    Some(e.designation_id),
                    as_of.date_naive(),
                )
            });
            (employee, parameter)
        } else {
            (None, None)
        };

        let corrected = apply_correction(
            &record,
            patch,
            employee.as_ref(),
            parameter.as_ref(),
            as_of,
        )?;
        let saved = self.store.replace(corrected)?;

        info!(
            company_id,
            pay_master_id,
            employee_id = saved.employee_id,
            recalculated = patch.recalculates(),
            net_salary = %saved.net_salary,
            "Payroll record corrected"
        );

        Ok(saved)
    }

    /// Lists a company's records.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Forbidden`] if the policy denies reads.
    pub fn list(
        &self,
        company_id: CompanyId,
        filter: &PayrollFilter,
        pagination: Pagination,
    ) -> EngineResult<PayrollPage> {
        authorize(self.policy.as_ref(), company_id, PayrollAction::ReadPayroll)?;
        let records = self.store.records(company_id, None)?;
        Ok(paginate(records, filter, pagination))
    }
}
