//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod pay_master;
mod pay_parameter;
mod pay_period;
mod salary_breakdown;

pub use employee::{CompanyId, DepartmentId, DesignationId, Employee, EmployeeId, EmployeeType};
pub use pay_master::{PayMaster, PayMasterId, round_currency};
pub use pay_parameter::{PayParameter, PayScope};
pub use pay_period::PayPeriod;
pub use salary_breakdown::{AuditStep, AuditWarning, NEGATIVE_NET_SALARY, SalaryBreakdown};
