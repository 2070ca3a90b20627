//! Collaborator interfaces consumed by the payroll core.
//!
//! Employees and pay parameter sets are owned by other services; the engine
//! only reads them through [`EmployeeDirectory`] and [`PayParameterSource`].
//! In-memory implementations back the tests and the bundled server.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calculation::resolve_pay_parameter;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CompanyId, DepartmentId, DesignationId, Employee, EmployeeId, EmployeeType, PayParameter,
    PayPeriod,
};

/// Read access to the employee-management collaborator.
pub trait EmployeeDirectory: Send + Sync {
    /// All employees of a company, active or not.
    fn employees(&self, company_id: CompanyId) -> Vec<Employee>;

    /// A single employee of a company.
    fn employee(&self, company_id: CompanyId, employee_id: EmployeeId) -> Option<Employee> {
        self.employees(company_id)
            .into_iter()
            .find(|e| e.id == employee_id)
    }

    /// Leave days the employee took in the period, paid or not.
    fn leave_days_taken(
        &self,
        _company_id: CompanyId,
        _employee_id: EmployeeId,
        _period: PayPeriod,
    ) -> Decimal {
        Decimal::ZERO
    }
}

/// Read access to the configuration-management collaborator.
pub trait PayParameterSource: Send + Sync {
    /// Every parameter set configured for a company.
    fn parameters(&self, company_id: CompanyId) -> Vec<PayParameter>;

    /// Resolves the parameter set applying to an employee on `as_of`.
    fn resolve(
        &self,
        company_id: CompanyId,
        employee_type: EmployeeType,
        department_id: Option<DepartmentId>,
        designation_id: Option<DesignationId>,
        as_of: NaiveDate,
    ) -> Option<PayParameter> {
        let candidates = self.parameters(company_id);
        resolve_pay_parameter(
            &candidates,
            company_id,
            employee_type,
            department_id,
            designation_id,
            as_of,
        )
        .cloned()
    }
}

/// An in-memory employee directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    employees: RwLock<HashMap<CompanyId, Vec<Employee>>>,
    leave: RwLock<HashMap<(EmployeeId, PayPeriod), Decimal>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding the given employees.
    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let directory = Self::new();
        for employee in employees {
            directory.upsert(employee);
        }
        directory
    }

    /// Inserts an employee or replaces the one with the same id.
    pub fn upsert(&self, employee: Employee) {
        let mut employees = self
            .employees
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let company = employees.entry(employee.company_id).or_default();
        match company.iter_mut().find(|e| e.id == employee.id) {
            Some(existing) => *existing = employee,
            None => company.push(employee),
        }
    }

    /// Records the leave days an employee took in a period.
    pub fn record_leave(&self, employee_id: EmployeeId, period: PayPeriod, days: Decimal) {
        self.leave
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert((employee_id, period), days);
    }
}

impl EmployeeDirectory for InMemoryDirectory {
    fn employees(&self, company_id: CompanyId) -> Vec<Employee> {
        self.employees
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&company_id)
            .cloned()
            .unwrap_or_default()
    }

    fn leave_days_taken(
        &self,
        _company_id: CompanyId,
        employee_id: EmployeeId,
        period: PayPeriod,
    ) -> Decimal {
        self.leave
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&(employee_id, period))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// An in-memory registry of pay parameter sets.
///
/// Enforces that at most one set is active for a (company, scope, date):
/// registering a second set with the same scope and effective date fails.
#[derive(Debug, Default)]
pub struct ParameterRegistry {
    parameters: RwLock<Vec<PayParameter>>,
}

impl ParameterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and adds a parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if the set is out of range or a
    /// set with the same company, scope and effective date already exists.
    pub fn register(&self, parameter: PayParameter) -> EngineResult<()> {
        parameter.validate()?;

        let mut parameters = self
            .parameters
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let duplicate = parameters.iter().any(|p| {
            p.company_id == parameter.company_id
                && p.scope == parameter.scope
                && p.effective_date == parameter.effective_date
        });
        if duplicate {
            return Err(EngineError::validation(
                "effective_date",
                format!(
                    "a {} pay parameter set effective {} already exists for company {}",
                    parameter.scope.employee_type, parameter.effective_date, parameter.company_id
                ),
            ));
        }

        parameters.push(parameter);
        Ok(())
    }

    /// Number of registered sets across all companies.
    pub fn len(&self) -> usize {
        self.parameters
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns true if no set is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PayParameterSource for ParameterRegistry {
    fn parameters(&self, company_id: CompanyId) -> Vec<PayParameter> {
        self.parameters
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|p| p.company_id == company_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PayScope;

    fn employee(id: EmployeeId, company_id: CompanyId) -> Employee {
        Employee {
            id,
            company_id,
            employee_code: format!("EMP-{:03}", id),
            name: format!("Employee {}", id),
            email: None,
            role: "EMPLOYEE".to_string(),
            employee_type: EmployeeType::Permanent,
            department_id: 1,
            designation_id: 1,
            basic_salary: Decimal::new(20000, 0),
            is_active: true,
        }
    }

    fn date(month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, 1).unwrap()
    }

    #[test]
    fn test_directory_is_scoped_by_company() {
        let directory = InMemoryDirectory::with_employees([employee(1, 1), employee(2, 2)]);
        assert_eq!(directory.employees(1).len(), 1);
        assert!(directory.employee(1, 2).is_none());
        assert!(directory.employee(2, 2).is_some());
    }

    #[test]
    fn test_upsert_replaces_existing() {
        let directory = InMemoryDirectory::with_employees([employee(1, 1)]);
        let mut updated = employee(1, 1);
        updated.employee_type = EmployeeType::Contract;
        directory.upsert(updated);

        let employees = directory.employees(1);
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].employee_type, EmployeeType::Contract);
    }

    #[test]
    fn test_leave_days_default_to_zero() {
        let directory = InMemoryDirectory::new();
        let period = PayPeriod::new(5, 2025).unwrap();
        assert_eq!(directory.leave_days_taken(1, 1, period), Decimal::ZERO);

        directory.record_leave(1, period, Decimal::new(3, 0));
        assert_eq!(directory.leave_days_taken(1, 1, period), Decimal::new(3, 0));
    }

    #[test]
    fn test_registry_rejects_duplicate_scope_and_date() {
        let registry = ParameterRegistry::new();
        let scope = PayScope::for_type(EmployeeType::Permanent);
        registry
            .register(PayParameter::zero_rated(1, scope, date(4)))
            .unwrap();

        let result = registry.register(PayParameter::zero_rated(1, scope, date(4)));
        assert!(matches!(result, Err(EngineError::Validation { .. })));

        // same scope, later date is a new version
        registry
            .register(PayParameter::zero_rated(1, scope, date(7)))
            .unwrap();
        // same scope and date in another company is independent
        registry
            .register(PayParameter::zero_rated(2, scope, date(4)))
            .unwrap();
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_registry_rejects_invalid_parameter() {
        let registry = ParameterRegistry::new();
        let mut parameter =
            PayParameter::zero_rated(1, PayScope::for_type(EmployeeType::Intern), date(4));
        parameter.da = Decimal::new(-5, 0);
        assert!(registry.register(parameter).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_resolves_through_source_trait() {
        let registry = ParameterRegistry::new();
        registry
            .register(PayParameter::zero_rated(
                1,
                PayScope::for_type(EmployeeType::Permanent),
                date(4),
            ))
            .unwrap();

        let resolved = registry.resolve(1, EmployeeType::Permanent, Some(1), Some(1), date(6));
        assert!(resolved.is_some());
        let resolved = registry.resolve(1, EmployeeType::Permanent, Some(1), Some(1), date(3));
        assert!(resolved.is_none());
    }
}
