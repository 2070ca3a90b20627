//! Salary component calculation.
//!
//! This module turns a basic salary and a resolved pay parameter set into a
//! full [`SalaryBreakdown`]: allowances scaled by the employee type
//! multiplier, statutory deductions, taxes and the unpaid leave penalty.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, EmployeeType, PayParameter, SalaryBreakdown};

use super::statutory::{epf_contribution, esi_contribution, percent};

/// Calculates every salary component for one employee and period.
///
/// The function is pure and deterministic. All arithmetic is exact decimal
/// arithmetic; nothing is rounded here.
///
/// # Arguments
///
/// * `basic_salary` - Monthly basic salary, must be positive
/// * `parameter` - The resolved pay parameter set
/// * `employee_type` - Drives the allowance multiplier and statutory eligibility
/// * `unpaid_leave_days` - Unpaid leave days in the period, must not be negative
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if the salary is not positive, the
/// leave days are negative, or any parameter is out of range.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_salary_components;
/// use payroll_engine::models::{EmployeeType, PayParameter, PayScope};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let mut parameter = PayParameter::zero_rated(
///     1,
///     PayScope::for_type(EmployeeType::Permanent),
///     NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
/// );
/// parameter.da = dec("10");
/// parameter.ta = dec("5");
/// parameter.hra = dec("20");
/// parameter.medical_all_rate = dec("5");
/// parameter.epf_rate = dec("12");
/// parameter.esi_rate = dec("0.75");
///
/// let breakdown = calculate_salary_components(
///     dec("20000"),
///     &parameter,
///     EmployeeType::Permanent,
///     Decimal::ZERO,
/// )
/// .unwrap();
///
/// assert_eq!(breakdown.gross_salary, dec("28000"));
/// assert_eq!(breakdown.epf, Decimal::ZERO); // basic above the EPF limit
/// assert_eq!(breakdown.esi, Decimal::ZERO); // gross above the ESI limit
/// assert_eq!(breakdown.net_salary, dec("28000"));
/// ```
pub fn calculate_salary_components(
    basic_salary: Decimal,
    parameter: &PayParameter,
    employee_type: EmployeeType,
    unpaid_leave_days: Decimal,
) -> EngineResult<SalaryBreakdown> {
    if basic_salary <= Decimal::ZERO {
        return Err(EngineError::validation(
            "basic_salary",
            format!("{} must be greater than 0", basic_salary),
        ));
    }
    if unpaid_leave_days < Decimal::ZERO {
        return Err(EngineError::validation(
            "unpaid_leave_days",
            format!("{} must not be negative", unpaid_leave_days),
        ));
    }
    parameter.validate()?;

    let mut audit_steps = Vec::with_capacity(6);
    let multiplier = employee_type.multiplier();

    // Allowances
    let scaled = |rate: Decimal| basic_salary * percent(rate) * multiplier;
    let da = scaled(parameter.da);
    let ta = scaled(parameter.ta);
    let hra = scaled(parameter.hra);
    let spall = scaled(parameter.spall);
    audit_steps.push(AuditStep {
        step_number: 1,
        rule_id: "allowances".to_string(),
        rule_name: "Percentage Allowances".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string(),
            "employee_type": employee_type.as_str(),
            "multiplier": multiplier.normalize().to_string(),
            "da_rate": parameter.da.normalize().to_string(),
            "ta_rate": parameter.ta.normalize().to_string(),
            "hra_rate": parameter.hra.normalize().to_string(),
            "spall_rate": parameter.spall.normalize().to_string()
        }),
        output: serde_json::json!({
            "da": da.normalize().to_string(),
            "ta": ta.normalize().to_string(),
            "hra": hra.normalize().to_string(),
            "spall": spall.normalize().to_string()
        }),
        reasoning: format!(
            "Each allowance = ${} x rate% x {} ({})",
            basic_salary.normalize(),
            multiplier.normalize(),
            employee_type
        ),
    });

    let (medical_all, medical_reasoning) = if parameter.medical_all_fixed > Decimal::ZERO {
        let amount = parameter.medical_all_fixed * multiplier;
        (
            amount,
            format!(
                "Fixed medical allowance ${} x {} = ${}",
                parameter.medical_all_fixed.normalize(),
                multiplier.normalize(),
                amount.normalize()
            ),
        )
    } else {
        let amount = scaled(parameter.medical_all_rate);
        (
            amount,
            format!(
                "${} x {}% x {} = ${}",
                basic_salary.normalize(),
                parameter.medical_all_rate.normalize(),
                multiplier.normalize(),
                amount.normalize()
            ),
        )
    };
    audit_steps.push(AuditStep {
        step_number: 2,
        rule_id: "medical_allowance".to_string(),
        rule_name: "Medical Allowance".to_string(),
        input: serde_json::json!({
            "medical_all_fixed": parameter.medical_all_fixed.normalize().to_string(),
            "medical_all_rate": parameter.medical_all_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "medical_all": medical_all.normalize().to_string(),
            "fixed_applied": parameter.medical_all_fixed > Decimal::ZERO
        }),
        reasoning: medical_reasoning,
    });

    let gross_salary = basic_salary + da + ta + hra + spall + medical_all;

    // Statutory deductions
    let epf = epf_contribution(
        basic_salary,
        parameter.epf_rate,
        parameter.epf_salary_limit,
        employee_type,
    );
    audit_steps.push(AuditStep {
        step_number: 3,
        rule_id: "epf".to_string(),
        rule_name: "Employee Provident Fund".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string(),
            "epf_rate": parameter.epf_rate.normalize().to_string(),
            "epf_salary_limit": parameter.epf_salary_limit.normalize().to_string()
        }),
        output: serde_json::json!({
            "epf": epf.normalize().to_string(),
            "applied": epf > Decimal::ZERO
        }),
        reasoning: statutory_reasoning(
            "EPF",
            employee_type,
            basic_salary,
            parameter.epf_salary_limit,
            parameter.epf_rate,
            epf,
        ),
    });

    let esi = esi_contribution(
        gross_salary,
        parameter.esi_rate,
        parameter.esi_salary_limit,
        employee_type,
    );
    audit_steps.push(AuditStep {
        step_number: 4,
        rule_id: "esi".to_string(),
        rule_name: "Employee State Insurance".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "esi_rate": parameter.esi_rate.normalize().to_string(),
            "esi_salary_limit": parameter.esi_salary_limit.normalize().to_string()
        }),
        output: serde_json::json!({
            "esi": esi.normalize().to_string(),
            "applied": esi > Decimal::ZERO
        }),
        reasoning: statutory_reasoning(
            "ESI",
            employee_type,
            gross_salary,
            parameter.esi_salary_limit,
            parameter.esi_rate,
            esi,
        ),
    });

    let tds = gross_salary * percent(parameter.tds_rate);
    let professional_tax = gross_salary * percent(parameter.professional_tax_rate);
    audit_steps.push(AuditStep {
        step_number: 5,
        rule_id: "taxes".to_string(),
        rule_name: "TDS and Professional Tax".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "tds_rate": parameter.tds_rate.normalize().to_string(),
            "professional_tax_rate": parameter.professional_tax_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "tds": tds.normalize().to_string(),
            "professional_tax": professional_tax.normalize().to_string()
        }),
        reasoning: format!(
            "${} x {}% = ${} TDS; ${} x {}% = ${} professional tax",
            gross_salary.normalize(),
            parameter.tds_rate.normalize(),
            tds.normalize(),
            gross_salary.normalize(),
            parameter.professional_tax_rate.normalize(),
            professional_tax.normalize()
        ),
    });

    let unpaid_leave_deduction = unpaid_leave_days * parameter.unpaid_leave_penalty_per_day;
    audit_steps.push(AuditStep {
        step_number: 6,
        rule_id: "unpaid_leave".to_string(),
        rule_name: "Unpaid Leave Deduction".to_string(),
        input: serde_json::json!({
            "unpaid_leave_days": unpaid_leave_days.normalize().to_string(),
            "penalty_per_day": parameter.unpaid_leave_penalty_per_day.normalize().to_string()
        }),
        output: serde_json::json!({
            "unpaid_leave_deduction": unpaid_leave_deduction.normalize().to_string()
        }),
        reasoning: format!(
            "{} day(s) x ${} = ${}",
            unpaid_leave_days.normalize(),
            parameter.unpaid_leave_penalty_per_day.normalize(),
            unpaid_leave_deduction.normalize()
        ),
    });

    let total_deductions = epf + esi + tds + professional_tax + unpaid_leave_deduction;
    let net_salary = gross_salary - total_deductions;

    let mut warnings = Vec::new();
    if net_salary < Decimal::ZERO {
        warnings.push(AuditWarning::negative_net_salary(net_salary));
    }

    Ok(SalaryBreakdown {
        employee_type,
        type_multiplier: multiplier,
        basic_salary,
        da,
        ta,
        hra,
        spall,
        medical_all,
        gross_salary,
        epf,
        esi,
        tds,
        professional_tax,
        unpaid_leave_days,
        unpaid_leave_deduction,
        total_deductions,
        net_salary,
        audit_steps,
        warnings,
    })
}

fn statutory_reasoning(
    name: &str,
    employee_type: EmployeeType,
    base: Decimal,
    limit: Decimal,
    rate: Decimal,
    amount: Decimal,
) -> String {
    if !employee_type.has_statutory_contributions() {
        format!("No {} - {} employees are not covered", name, employee_type)
    } else if base > limit {
        format!(
            "No {} - ${} exceeds the ${} limit",
            name,
            base.normalize(),
            limit.normalize()
        )
    } else {
        format!(
            "${} x {}% = ${}",
            base.normalize(),
            rate.normalize(),
            amount.normalize()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PayScope;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// The rate set used by the worked example.
    fn worked_example_parameter() -> PayParameter {
        let mut parameter = PayParameter::zero_rated(
            1,
            PayScope::for_type(EmployeeType::Permanent),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        );
        parameter.da = dec("10");
        parameter.ta = dec("5");
        parameter.hra = dec("20");
        parameter.spall = dec("0");
        parameter.medical_all_rate = dec("5");
        parameter.epf_rate = dec("12");
        parameter.epf_salary_limit = dec("15000");
        parameter.esi_rate = dec("0.75");
        parameter.esi_salary_limit = dec("25000");
        parameter
    }

    #[test]
    fn test_worked_example_permanent() {
        let breakdown = calculate_salary_components(
            dec("20000"),
            &worked_example_parameter(),
            EmployeeType::Permanent,
            Decimal::ZERO,
        )
        .unwrap();

        assert_eq!(breakdown.da, dec("2000"));
        assert_eq!(breakdown.ta, dec("1000"));
        assert_eq!(breakdown.hra, dec("4000"));
        assert_eq!(breakdown.spall, dec("0"));
        assert_eq!(breakdown.medical_all, dec("1000"));
        assert_eq!(breakdown.gross_salary, dec("28000"));
        assert_eq!(breakdown.epf, Decimal::ZERO);
        assert_eq!(breakdown.esi, Decimal::ZERO);
        assert_eq!(breakdown.total_deductions, Decimal::ZERO);
        assert_eq!(breakdown.net_salary, dec("28000"));
        assert!(breakdown.warnings.is_empty());
    }

    #[test]
    fn test_epf_applied_at_exact_limit() {
        let breakdown = calculate_salary_components(
            dec("15000"),
            &worked_example_parameter(),
            EmployeeType::Permanent,
            Decimal::ZERO,
        )
        .unwrap();
        assert_eq!(breakdown.epf, dec("1800"));
    }

    #[test]
    fn test_epf_dropped_one_paisa_above_limit() {
        let breakdown = calculate_salary_components(
            dec("15000.01"),
            &worked_example_parameter(),
            EmployeeType::Permanent,
            Decimal::ZERO,
        )
        .unwrap();
        assert_eq!(breakdown.epf, Decimal::ZERO);
    }

    #[test]
    fn test_esi_applied_when_gross_within_limit() {
        let breakdown = calculate_salary_components(
            dec("10000"),
            &worked_example_parameter(),
            EmployeeType::Contract,
            Decimal::ZERO,
        )
        .unwrap();
        // contract multiplier 0.8: allowances 3200, gross 13200
        assert_eq!(breakdown.gross_salary, dec("13200"));
        assert_eq!(breakdown.esi, dec("99"));
        assert_eq!(breakdown.epf, dec("1200"));
    }

    #[test]
    fn test_intern_allowances_are_half_of_permanent() {
        let parameter = worked_example_parameter();
        let permanent =
            calculate_salary_components(dec("20000"), &parameter, EmployeeType::Permanent, Decimal::ZERO)
                .unwrap();
        let intern =
            calculate_salary_components(dec("20000"), &parameter, EmployeeType::Intern, Decimal::ZERO)
                .unwrap();

        assert_eq!(intern.allowance_total() * dec("2"), permanent.allowance_total());
        assert_eq!(intern.da, dec("1000"));
        assert_eq!(intern.epf, Decimal::ZERO);
        assert_eq!(intern.esi, Decimal::ZERO);
    }

    #[test]
    fn test_fixed_medical_overrides_rate() {
        let mut parameter = worked_example_parameter();
        parameter.medical_all_fixed = dec("1250");

        let breakdown = calculate_salary_components(
            dec("20000"),
            &parameter,
            EmployeeType::PartTime,
            Decimal::ZERO,
        )
        .unwrap();

        assert_eq!(breakdown.medical_all, dec("750"));
        assert_eq!(
            breakdown.audit_steps[1].output["fixed_applied"].as_bool(),
            Some(true)
        );
    }

    #[test]
    fn test_tds_and_professional_tax_apply_to_all_types() {
        let mut parameter = worked_example_parameter();
        parameter.tds_rate = dec("10");
        parameter.professional_tax_rate = dec("1");

        let breakdown = calculate_salary_components(
            dec("20000"),
            &parameter,
            EmployeeType::Consultant,
            Decimal::ZERO,
        )
        .unwrap();

        // consultant multiplier 0.9: allowances 7200, gross 27200
        assert_eq!(breakdown.gross_salary, dec("27200"));
        assert_eq!(breakdown.tds, dec("2720"));
        assert_eq!(breakdown.professional_tax, dec("272"));
        assert_eq!(breakdown.net_salary, dec("24208"));
    }

    #[test]
    fn test_unpaid_leave_deduction() {
        let mut parameter = worked_example_parameter();
        parameter.unpaid_leave_penalty_per_day = dec("500");

        let breakdown = calculate_salary_components(
            dec("20000"),
            &parameter,
            EmployeeType::Permanent,
            dec("3"),
        )
        .unwrap();

        assert_eq!(breakdown.unpaid_leave_deduction, dec("1500"));
        assert_eq!(breakdown.total_deductions, dec("1500"));
        assert_eq!(breakdown.net_salary, dec("26500"));
    }

    #[test]
    fn test_negative_net_is_flagged_not_clamped() {
        let mut parameter = worked_example_parameter();
        parameter.unpaid_leave_penalty_per_day = dec("2000");

        let breakdown = calculate_salary_components(
            dec("20000"),
            &parameter,
            EmployeeType::Permanent,
            dec("20"),
        )
        .unwrap();

        assert_eq!(breakdown.net_salary, dec("-12000"));
        assert!(breakdown.has_negative_net());
    }

    #[test]
    fn test_rejects_non_positive_basic() {
        let result = calculate_salary_components(
            Decimal::ZERO,
            &worked_example_parameter(),
            EmployeeType::Permanent,
            Decimal::ZERO,
        );
        match result {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "basic_salary"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_negative_leave_days() {
        let result = calculate_salary_components(
            dec("20000"),
            &worked_example_parameter(),
            EmployeeType::Permanent,
            dec("-1"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_out_of_range_parameter() {
        let mut parameter = worked_example_parameter();
        parameter.tds_rate = dec("150");
        let result =
            calculate_salary_components(dec("20000"), &parameter, EmployeeType::Permanent, Decimal::ZERO);
        match result {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "tds_rate"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_audit_trail_is_sequenced() {
        let breakdown = calculate_salary_components(
            dec("20000"),
            &worked_example_parameter(),
            EmployeeType::Permanent,
            Decimal::ZERO,
        )
        .unwrap();

        let step_numbers: Vec<u32> = breakdown.audit_steps.iter().map(|s| s.step_number).collect();
        assert_eq!(step_numbers, vec![1, 2, 3, 4, 5, 6]);
        assert!(breakdown.audit_steps[2].reasoning.contains("exceeds the $15000 limit"));
        assert_eq!(
            breakdown.audit_steps[0].output["da"].as_str().unwrap(),
            "2000"
        );
    }

    #[test]
    fn test_is_deterministic() {
        let parameter = worked_example_parameter();
        let first =
            calculate_salary_components(dec("18250.75"), &parameter, EmployeeType::Temporary, dec("1.5"))
                .unwrap();
        let second =
            calculate_salary_components(dec("18250.75"), &parameter, EmployeeType::Temporary, dec("1.5"))
                .unwrap();
        assert_eq!(first, second);
    }
}
