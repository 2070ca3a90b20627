//! Month-over-month trends.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{PayMaster, PayPeriod};

use super::{average, percent_change};

/// Aggregates of one month in a trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// The month.
    pub period: PayPeriod,
    /// Number of records.
    pub employee_count: usize,
    /// Sum of gross salary.
    pub total_gross: Decimal,
    /// Sum of net salary.
    pub total_net: Decimal,
    /// Sum of total deductions.
    pub total_deductions: Decimal,
    /// Mean net salary, 2 dp.
    pub average_net: Decimal,
    /// Sum of EPF.
    pub epf: Decimal,
    /// Sum of ESI.
    pub esi: Decimal,
    /// Sum of TDS.
    pub tds: Decimal,
    /// Gross growth against the previous point; absent on the first point
    /// or after an empty month.
    pub gross_growth_percent: Option<Decimal>,
    /// Net growth against the previous point.
    pub net_growth_percent: Option<Decimal>,
}

/// Builds the trend series from per-month record sets, oldest first.
pub fn trend_points(months: Vec<(PayPeriod, Vec<PayMaster>)>) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = Vec::with_capacity(months.len());

    for (period, records) in months {
        let sum = |f: fn(&PayMaster) -> Decimal| records.iter().map(f).sum::<Decimal>();
        let total_gross = sum(|r| r.gross_salary);
        let total_net = sum(|r| r.net_salary);

        let (gross_growth_percent, net_growth_percent) = match points.last() {
            Some(previous) => (
                percent_change(previous.total_gross, total_gross),
                percent_change(previous.total_net, total_net),
            ),
            None => (None, None),
        };

        points.push(TrendPoint {
            period,
            employee_count: records.len(),
            total_gross,
            total_net,
            total_deductions: sum(|r| r.total_deductions),
            average_net: average(total_net, records.len()),
            epf: sum(|r| r.epf),
            esi: sum(|r| r.esi),
            tds: sum(|r| r.tds),
            gross_growth_percent,
            net_growth_percent,
        });
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{dec, record};
    use crate::models::EmployeeType;

    fn month(m: u32) -> PayPeriod {
        PayPeriod::new(m, 2025).unwrap()
    }

    #[test]
    fn test_growth_against_previous_point() {
        let months = vec![
            (
                month(2),
                vec![record(1, EmployeeType::Permanent, 1, "EMPLOYEE", "20000", "2000")],
            ),
            (
                month(3),
                vec![
                    record(1, EmployeeType::Permanent, 1, "EMPLOYEE", "20000", "2000"),
                    record(2, EmployeeType::Permanent, 1, "EMPLOYEE", "5000", "0"),
                ],
            ),
        ];

        let points = trend_points(months);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].gross_growth_percent, None);
        assert_eq!(points[1].total_gross, dec("25000"));
        assert_eq!(points[1].gross_growth_percent, Some(dec("25")));
        assert_eq!(points[1].net_growth_percent, Some(dec("27.78")));
        assert_eq!(points[1].average_net, dec("11500"));
    }

    #[test]
    fn test_empty_month_breaks_growth() {
        let months = vec![
            (month(2), vec![]),
            (
                month(3),
                vec![record(1, EmployeeType::Permanent, 1, "EMPLOYEE", "20000", "0")],
            ),
        ];

        let points = trend_points(months);

        assert_eq!(points[0].employee_count, 0);
        assert_eq!(points[0].average_net, Decimal::ZERO);
        assert_eq!(points[1].gross_growth_percent, None);
    }
}
