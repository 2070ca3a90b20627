//! Calculation logic for the payroll engine.
//!
//! This module contains pay parameter resolution, the salary component
//! calculator and the statutory deduction rules shared with the compliance
//! report.

mod resolver;
mod salary_components;
mod statutory;

pub use resolver::resolve_pay_parameter;
pub use salary_components::calculate_salary_components;
pub use statutory::{epf_contribution, esi_contribution};
