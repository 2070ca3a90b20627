//! Statutory compliance checks over stored records.
//!
//! Each record is checked three times: EPF and ESI are recomputed from the
//! stored basic and statutory gross and compared with the stored values,
//! and the basic salary is compared with the minimum wage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{epf_contribution, esi_contribution, resolve_pay_parameter};
use crate::config::EngineSettings;
use crate::models::{EmployeeId, PayMaster, PayMasterId, PayParameter, PayPeriod, round_currency};

use super::round_percent;

/// Checks applied to every record.
const CHECKS_PER_RECORD: usize = 3;

/// The kind of a compliance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceCheck {
    /// Stored EPF matches the recomputed EPF.
    Epf,
    /// Stored ESI matches the recomputed ESI.
    Esi,
    /// Basic salary is at least the minimum wage.
    MinimumWage,
}

/// A failed check on one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceIssue {
    /// The record checked.
    pub pay_master_id: PayMasterId,
    /// The employee the record belongs to.
    pub employee_id: EmployeeId,
    /// The check that failed.
    pub check: ComplianceCheck,
    /// The value the check expected.
    pub expected: Decimal,
    /// The value found on the record.
    pub actual: Decimal,
    /// A human-readable description.
    pub message: String,
}

/// Compliance of one period's records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// The period checked.
    pub period: PayPeriod,
    /// Number of records checked.
    pub total_employees: usize,
    /// Records passing the EPF check.
    pub epf_compliant: usize,
    /// Records passing the ESI check.
    pub esi_compliant: usize,
    /// Records passing the minimum wage check.
    pub minimum_wage_compliant: usize,
    /// Passed checks as a percentage of all checks, 2 dp.
    pub compliance_score: Decimal,
    /// Every failed check.
    pub issues: Vec<ComplianceIssue>,
    /// Follow-up actions; empty when there are no issues.
    pub recommendations: Vec<String>,
}

/// Checks every record of a period.
///
/// `parameters` are the company's pay parameter sets; each record is checked
/// against the set resolvable for its snapshot scope on the date its
/// components were last resolved, or against the statutory reference rates
/// in `settings` when none resolves.
pub fn check_compliance(
    period: PayPeriod,
    records: &[PayMaster],
    parameters: &[PayParameter],
    settings: &EngineSettings,
) -> ComplianceReport {
    let tolerance = settings.compliance_tolerance;
    let mut report = ComplianceReport {
        period,
        total_employees: records.len(),
        epf_compliant: 0,
        esi_compliant: 0,
        minimum_wage_compliant: 0,
        compliance_score: Decimal::ONE_HUNDRED,
        issues: Vec::new(),
        recommendations: Vec::new(),
    };

    for record in records {
        let resolved = resolve_pay_parameter(
            parameters,
            record.company_id,
            record.employee_type,
            Some(record.department_id),
            Some(record.designation_id),
            record.resolution_date(),
        );
        let statutory = &settings.statutory;
        let (epf_rate, epf_limit, esi_rate, esi_limit) = match resolved {
            Some(p) => (p.epf_rate, p.epf_salary_limit, p.esi_rate, p.esi_salary_limit),
            None => (
                statutory.epf_rate,
                statutory.epf_salary_limit,
                statutory.esi_rate,
                statutory.esi_salary_limit,
            ),
        };

        let expected_epf = round_currency(epf_contribution(
            record.basic_salary,
            epf_rate,
            epf_limit,
            record.employee_type,
        ));
        if (record.epf - expected_epf).abs() > tolerance {
            report.issues.push(issue(
                record,
                ComplianceCheck::Epf,
                expected_epf,
                record.epf,
                format!("EPF {} deviates from expected {}", record.epf, expected_epf),
            ));
        } else {
            report.epf_compliant += 1;
        }

        let expected_esi = round_currency(esi_contribution(
            record.statutory_gross(),
            esi_rate,
            esi_limit,
            record.employee_type,
        ));
        if (record.esi - expected_esi).abs() > tolerance {
            report.issues.push(issue(
                record,
                ComplianceCheck::Esi,
                expected_esi,
                record.esi,
                format!("ESI {} deviates from expected {}", record.esi, expected_esi),
            ));
        } else {
            report.esi_compliant += 1;
        }

        if record.basic_salary < settings.minimum_wage {
            report.issues.push(issue(
                record,
                ComplianceCheck::MinimumWage,
                settings.minimum_wage,
                record.basic_salary,
                format!(
                    "Basic salary {} is below the minimum wage {}",
                    record.basic_salary, settings.minimum_wage
                ),
            ));
        } else {
            report.minimum_wage_compliant += 1;
        }
    }

    if !records.is_empty() {
        let passed = report.epf_compliant + report.esi_compliant + report.minimum_wage_compliant;
        let total = records.len() * CHECKS_PER_RECORD;
        report.compliance_score =
            round_percent(Decimal::from(passed) / Decimal::from(total) * Decimal::ONE_HUNDRED);
    }

    if !report.issues.is_empty() {
        report.recommendations = vec![
            "Review pay parameter configurations".to_string(),
            "Ensure minimum wage compliance".to_string(),
            "Verify EPF and ESI calculations".to_string(),
            "Update employee types if necessary".to_string(),
        ];
    }

    report
}

fn issue(
    record: &PayMaster,
    check: ComplianceCheck,
    expected: Decimal,
    actual: Decimal,
    message: String,
) -> ComplianceIssue {
    ComplianceIssue {
        pay_master_id: record.id,
        employee_id: record.employee_id,
        check,
        expected,
        actual,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{dec, record};
    use crate::models::{EmployeeType, PayScope};
    use chrono::NaiveDate;

    fn april() -> PayPeriod {
        PayPeriod::new(4, 2025).unwrap()
    }

    /// A permanent record with basic 15000 and statutory gross 20000.
    fn compliant_record(id: EmployeeId) -> PayMaster {
        let mut r = record(id, EmployeeType::Permanent, 1, "EMPLOYEE", "20000", "1950");
        r.basic_salary = dec("15000");
        r.hra = dec("5000");
        r.epf = dec("1800");
        r.esi = dec("150");
        r
    }

    #[test]
    fn test_fully_compliant_period() {
        let records = vec![compliant_record(1), compliant_record(2)];
        let report = check_compliance(april(), &records, &[], &EngineSettings::default());

        assert_eq!(report.total_employees, 2);
        assert_eq!(report.epf_compliant, 2);
        assert_eq!(report.esi_compliant, 2);
        assert_eq!(report.minimum_wage_compliant, 2);
        assert_eq!(report.compliance_score, dec("100"));
        assert!(report.issues.is_empty());
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_epf_deviation_beyond_tolerance_is_flagged() {
        let mut tampered = compliant_record(2);
        tampered.epf = dec("1798.5");
        let mut within = compliant_record(3);
        within.epf = dec("1799.5");

        let records = vec![compliant_record(1), tampered, within];
        let report = check_compliance(april(), &records, &[], &EngineSettings::default());

        assert_eq!(report.epf_compliant, 2);
        assert_eq!(report.issues.len(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.employee_id, 2);
        assert_eq!(issue.check, ComplianceCheck::Epf);
        assert_eq!(issue.expected, dec("1800"));
        // 8 of 9 checks pass
        assert_eq!(report.compliance_score, dec("88.89"));
        assert_eq!(report.recommendations.len(), 4);
    }

    #[test]
    fn test_minimum_wage() {
        let mut low = compliant_record(1);
        low.basic_salary = dec("14999");
        low.epf = dec("1799.88");

        let report = check_compliance(april(), &[low], &[], &EngineSettings::default());

        assert_eq!(report.minimum_wage_compliant, 0);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].check, ComplianceCheck::MinimumWage);
    }

    #[test]
    fn test_resolved_parameters_take_precedence_over_reference() {
        let mut parameter = PayParameter::zero_rated(
            1,
            PayScope::for_type(EmployeeType::Permanent),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        );
        parameter.epf_rate = dec("10");
        parameter.esi_rate = dec("0.75");

        let mut r = compliant_record(1);
        r.epf = dec("1500");
        let report = check_compliance(april(), &[r], &[parameter], &EngineSettings::default());

        assert_eq!(report.epf_compliant, 1);
    }

    #[test]
    fn test_record_is_checked_against_its_own_resolution_date() {
        let date = |m| NaiveDate::from_ymd_opt(2025, m, 1).unwrap();
        let mut january = PayParameter::zero_rated(1, PayScope::for_type(EmployeeType::Permanent), date(1));
        january.epf_rate = dec("12");
        january.esi_rate = dec("0.75");
        let mut june = january.clone();
        june.effective_date = date(6);
        june.epf_rate = dec("10");
        let parameters = [january, june];

        // generated in April, corrected in July at the June rate
        let mut corrected = compliant_record(1);
        corrected.epf = dec("1500");
        corrected.parameters_as_of = Some(NaiveDate::from_ymd_opt(2025, 7, 2).unwrap());
        let mut generated = compliant_record(2);
        generated.parameters_as_of = Some(april().last_day());

        let report = check_compliance(
            april(),
            &[corrected, generated],
            &parameters,
            &EngineSettings::default(),
        );

        assert_eq!(report.epf_compliant, 2);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_manual_allowance_does_not_change_expected_esi() {
        let mut r = compliant_record(1);
        r.other_allowance = dec("10000");
        r.gross_salary = dec("30000");

        let report = check_compliance(april(), &[r], &[], &EngineSettings::default());
        assert_eq!(report.esi_compliant, 1);
    }

    #[test]
    fn test_empty_period_scores_full_marks() {
        let report = check_compliance(april(), &[], &[], &EngineSettings::default());
        assert_eq!(report.total_employees, 0);
        assert_eq!(report.compliance_score, dec("100"));
    }

    #[test]
    fn test_interns_expect_no_contributions() {
        let mut r = record(1, EmployeeType::Intern, 1, "EMPLOYEE", "16000", "0");
        r.basic_salary = dec("16000");
        let report = check_compliance(april(), &[r], &[], &EngineSettings::default());
        assert_eq!(report.epf_compliant, 1);
        assert_eq!(report.esi_compliant, 1);
        assert_eq!(report.minimum_wage_compliant, 1);
    }
}
