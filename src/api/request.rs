//! Request types for the payroll API.
//!
//! JSON bodies and query strings accepted by the endpoints, with their
//! conversions into engine types.

use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsScope, GroupBy};
use crate::error::{EngineError, EngineResult};
use crate::generation::GenerationFilter;
use crate::models::{DepartmentId, DesignationId, EmployeeId, EmployeeType, PayPeriod};
use crate::store::{Pagination, PayrollFilter};

/// Body of `POST /companies/:company_id/payroll/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The period month, 1-12.
    pub month: u32,
    /// The period year.
    pub year: i32,
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

impl GenerateRequest {
    /// The requested period.
    pub fn period(&self) -> EngineResult<PayPeriod> {
        PayPeriod::new(self.month, self.year)
    }

    /// The employee filter of the run.
    pub fn filter(&self) -> GenerationFilter {
        GenerationFilter {
            employee_type: self.employee_type,
            department_ids: self.department_ids.clone(),
            employee_ids: self.employee_ids.clone(),
        }
    }
}

/// Query of `GET /companies/:company_id/payroll`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Page number, from 1.
    pub page: Option<u32>,
    /// Page size, at most 100.
    pub limit: Option<u32>,
    /// Only this month.
    pub month: Option<u32>,
    /// Only this year.
    pub year: Option<i32>,
    /// Only this employee.
    pub employee_id: Option<EmployeeId>,
    /// Only this employee type.
    pub employee_type: Option<EmployeeType>,
    /// Only this department.
    pub department_id: Option<DepartmentId>,
    /// Only this designation.
    pub designation_id: Option<DesignationId>,
}

impl ListQuery {
    /// The record filter.
    pub fn filter(&self) -> PayrollFilter {
        PayrollFilter {
            month: self.month,
            year: self.year,
            employee_id: self.employee_id,
            employee_type: self.employee_type,
            department_id: self.department_id,
            designation_id: self.designation_id,
        }
    }

    /// The requested page, defaulting to the first page of ten.
    pub fn pagination(&self) -> EngineResult<Pagination> {
        let default = Pagination::default();
        Pagination::new(
            self.page.unwrap_or(default.page),
            self.limit.unwrap_or(default.limit),
        )
    }
}

/// Query of the summary endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryQuery {
    /// The period month.
    pub month: u32,
    /// The period year.
    pub year: i32,
    /// Only records of this employee type.
    pub employee_type: Option<EmployeeType>,
    /// Comma-separated department ids, e.g. `10,20`.
    pub department_ids: Option<String>,
    /// Include the change against the previous month.
    #[serde(default)]
    pub compare_with_previous: bool,
}

impl SummaryQuery {
    /// The requested period.
    pub fn period(&self) -> EngineResult<PayPeriod> {
        PayPeriod::new(self.month, self.year)
    }

    /// The scope of the summary.
    pub fn scope(&self) -> EngineResult<AnalyticsScope> {
        let department_ids = self
            .department_ids
            .as_deref()
            .map(parse_id_list)
            .transpose()?;
        Ok(AnalyticsScope {
            employee_type: self.employee_type,
            department_ids,
        })
    }
}

/// Query of the trends endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsQuery {
    /// Month of the last point.
    pub month: u32,
    /// Year of the last point.
    pub year: i32,
    /// Number of months in the series.
    #[serde(default = "default_trend_months")]
    pub months: u32,
}

fn default_trend_months() -> u32 {
    12
}

impl TrendsQuery {
    /// The last period of the series.
    pub fn end(&self) -> EngineResult<PayPeriod> {
        PayPeriod::new(self.month, self.year)
    }
}

/// Query of the cost endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostQuery {
    /// The period month.
    pub month: u32,
    /// The period year.
    pub year: i32,
    /// Grouping of the breakdown.
    #[serde(default)]
    pub group_by: GroupBy,
}

impl CostQuery {
    /// The requested period.
    pub fn period(&self) -> EngineResult<PayPeriod> {
        PayPeriod::new(self.month, self.year)
    }
}

/// Query naming one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodQuery {
    /// The period month.
    pub month: u32,
    /// The period year.
    pub year: i32,
}

impl PeriodQuery {
    /// The requested period.
    pub fn period(&self) -> EngineResult<PayPeriod> {
        PayPeriod::new(self.month, self.year)
    }
}

fn parse_id_list(raw: &str) -> EngineResult<Vec<DepartmentId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse().map_err(|_| {
                EngineError::validation("department_ids", format!("'{}' is not a valid id", s))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_deserialization() {
        let json = r#"{
            "month": 4,
            "year": 2025,
            "employee_type": "CONTRACT",
            "employee_ids": [2, 3]
        }"#;

        let request: GenerateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.period().unwrap(), PayPeriod::new(4, 2025).unwrap());

        let filter = request.filter();
        assert_eq!(filter.employee_type, Some(EmployeeType::Contract));
        assert_eq!(filter.department_ids, None);
        assert_eq!(filter.employee_ids, Some(vec![2, 3]));
    }

    #[test]
    fn test_generate_request_rejects_bad_month() {
        let request: GenerateRequest =
            serde_json::from_str(r#"{"month": 13, "year": 2025}"#).unwrap();
        assert!(matches!(
            request.period(),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_list_query_pagination_defaults() {
        let query = ListQuery::default();
        let pagination = query.pagination().unwrap();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.limit, 10);

        let too_large = ListQuery {
            limit: Some(101),
            ..ListQuery::default()
        };
        assert!(too_large.pagination().is_err());
    }

    #[test]
    fn test_summary_scope_parses_department_list() {
        let query = SummaryQuery {
            month: 4,
            year: 2025,
            employee_type: None,
            department_ids: Some("10, 20".to_string()),
            compare_with_previous: false,
        };
        assert_eq!(query.scope().unwrap().department_ids, Some(vec![10, 20]));

        let bad = SummaryQuery {
            department_ids: Some("10,sales".to_string()),
            ..query
        };
        match bad.scope() {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "department_ids"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }
}
