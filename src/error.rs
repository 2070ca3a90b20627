//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while resolving pay parameters,
//! generating payroll, correcting records and aggregating the ledger.

use thiserror::Error;

use crate::models::{CompanyId, EmployeeId, EmployeeType};

/// The main error type for the payroll engine.
///
/// All payroll operations return this error type. Notification failures are
/// deliberately not part of it: they are logged and counted, never surfaced
/// as a failure of the payroll operation that triggered them.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::DuplicatePeriod {
///     month: 3,
///     year: 2025,
///     existing: 4,
/// };
/// assert_eq!(
///     error.to_string(),
///     "Payroll for 3/2025 already generated for 4 selected employee(s); use the correction path instead"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An input value was rejected before any work was done.
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// No pay parameter set could be resolved for an employee.
    #[error("No pay parameters configured for employee {employee_id} of type {employee_type}")]
    ConfigurationMissing {
        /// The employee for whom resolution failed.
        employee_id: EmployeeId,
        /// The employee's type at the time of resolution.
        employee_type: EmployeeType,
    },

    /// Payroll rows already exist for the targeted employees and period.
    #[error(
        "Payroll for {month}/{year} already generated for {existing} selected employee(s); use the correction path instead"
    )]
    DuplicatePeriod {
        /// The period month.
        month: u32,
        /// The period year.
        year: i32,
        /// How many conflicting rows were found.
        existing: usize,
    },

    /// The payroll store failed; nothing from the batch was written.
    #[error("Persistence failure: {message}")]
    Persistence {
        /// A description of the storage failure.
        message: String,
    },

    /// A requested entity does not exist within the caller's company.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "PayMaster").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The access policy denied the action.
    #[error("Access denied for action: {action}")]
    Forbidden {
        /// The action that was attempted.
        action: String,
    },

    /// The generation filter selected no active employees.
    #[error("No active employees matched the generation filter for company {company_id}")]
    NoEligibleEmployees {
        /// The company the run targeted.
        company_id: CompanyId,
    },

    /// A tenant cannot be deleted while it has payroll history.
    #[error("Company {company_id} has {records} payroll record(s) and cannot be deleted")]
    CompanyHasPayrollHistory {
        /// The company whose deletion was requested.
        company_id: CompanyId,
        /// Number of payroll rows on record.
        records: usize,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
