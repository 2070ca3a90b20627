//! Payslip notifications.
//!
//! Payslips are dispatched after a generation batch has been committed.
//! Delivery is best-effort: each recipient is sent on its own blocking task,
//! failures are logged and counted, and nothing here can undo or fail the
//! payroll run that triggered it.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::models::{CompanyId, Employee, EmployeeId, PayMaster, PayMasterId, PayPeriod};

/// A failure to deliver one payslip.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The delivery service refused the message.
    #[error("Payslip for {recipient} rejected: {reason}")]
    Rejected {
        /// The address the payslip was sent to.
        recipient: String,
        /// Why the message was refused.
        reason: String,
    },

    /// The delivery service could not be reached.
    #[error("Notification service unavailable: {message}")]
    Unavailable {
        /// A description of the failure.
        message: String,
    },
}

/// The content of one payslip notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    /// The payroll record the payslip summarises.
    pub pay_master_id: PayMasterId,
    /// Owning company.
    pub company_id: CompanyId,
    /// The employee paid.
    pub employee_id: EmployeeId,
    /// Display name of the employee.
    pub employee_name: String,
    /// Recipient address; payslips without one are skipped.
    pub email: Option<String>,
    /// The period paid.
    pub period: PayPeriod,
    /// Gross salary.
    pub gross_salary: Decimal,
    /// Total deductions.
    pub total_deductions: Decimal,
    /// Net salary.
    pub net_salary: Decimal,
}

impl Payslip {
    /// Builds the payslip for a committed record.
    pub fn new(record: &PayMaster, employee: &Employee) -> Self {
        Self {
            pay_master_id: record.id,
            company_id: record.company_id,
            employee_id: record.employee_id,
            employee_name: employee.name.clone(),
            email: employee.email.clone(),
            period: record.period(),
            gross_salary: record.gross_salary,
            total_deductions: record.total_deductions,
            net_salary: record.net_salary,
        }
    }

    /// Subject line of the message.
    pub fn subject(&self) -> String {
        format!("Payslip for {}", self.period)
    }

    /// Plain-text body of the message.
    pub fn body(&self) -> String {
        format!(
            "Dear {},\n\nYour salary has been processed for {}.\n\n\
             Gross Salary: {}\nDeductions: {}\nNet Salary: {}\n",
            self.employee_name,
            self.period,
            self.gross_salary,
            self.total_deductions,
            self.net_salary
        )
    }
}

/// A sink for payslip notifications.
///
/// Implementations may block; they are always called from a blocking task.
pub trait PayslipNotifier: Send + Sync {
    /// Delivers one payslip.
    fn send_payslip(&self, payslip: &Payslip) -> Result<(), NotificationError>;
}

/// A notifier that writes each payslip to the log instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl PayslipNotifier for LogNotifier {
    fn send_payslip(&self, payslip: &Payslip) -> Result<(), NotificationError> {
        info!(
            company_id = payslip.company_id,
            employee_id = payslip.employee_id,
            pay_master_id = payslip.pay_master_id,
            recipient = payslip.email.as_deref().unwrap_or_default(),
            subject = %payslip.subject(),
            net_salary = %payslip.net_salary,
            "Payslip sent"
        );
        Ok(())
    }
}

/// Outcome counts of a payslip dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    /// Payslips delivered.
    pub sent: usize,
    /// Payslips whose delivery failed.
    pub failed: usize,
    /// Payslips not attempted because the employee has no email.
    pub skipped: usize,
}

/// Sends every payslip concurrently, one blocking task per recipient.
///
/// Never fails: each failure is logged and counted in the summary.
pub async fn dispatch_payslips(
    notifier: Arc<dyn PayslipNotifier>,
    payslips: Vec<Payslip>,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();
    let mut tasks = JoinSet::new();

    for payslip in payslips {
        if payslip.email.is_none() {
            warn!(
                employee_id = payslip.employee_id,
                name = %payslip.employee_name,
                "Skipping payslip, no email on record"
            );
            summary.skipped += 1;
            continue;
        }

        let notifier = Arc::clone(&notifier);
        tasks.spawn_blocking(move || {
            let result = notifier.send_payslip(&payslip);
            (payslip.employee_id, result)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(()))) => summary.sent += 1,
            Ok((employee_id, Err(error))) => {
                warn!(employee_id, error = %error, "Payslip delivery failed");
                summary.failed += 1;
            }
            Err(error) => {
                warn!(error = %error, "Payslip task did not complete");
                summary.failed += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingNotifier {
        sent: Mutex<Vec<EmployeeId>>,
        reject: EmployeeId,
    }

    impl PayslipNotifier for RecordingNotifier {
        fn send_payslip(&self, payslip: &Payslip) -> Result<(), NotificationError> {
            if payslip.employee_id == self.reject {
                return Err(NotificationError::Rejected {
                    recipient: payslip.email.clone().unwrap_or_default(),
                    reason: "mailbox full".to_string(),
                });
            }
            self.sent.lock().unwrap().push(payslip.employee_id);
            Ok(())
        }
    }

    fn payslip(employee_id: EmployeeId, email: Option<&str>) -> Payslip {
        Payslip {
            pay_master_id: employee_id,
            company_id: 1,
            employee_id,
            employee_name: format!("Employee {}", employee_id),
            email: email.map(str::to_string),
            period: PayPeriod::new(4, 2025).unwrap(),
            gross_salary: Decimal::new(28000, 0),
            total_deductions: Decimal::ZERO,
            net_salary: Decimal::new(28000, 0),
        }
    }

    #[tokio::test]
    async fn test_dispatch_counts_each_outcome() {
        let notifier = Arc::new(RecordingNotifier {
            sent: Mutex::new(vec![]),
            reject: 2,
        });
        let payslips = vec![
            payslip(1, Some("a@example.com")),
            payslip(2, Some("b@example.com")),
            payslip(3, None),
            payslip(4, Some("d@example.com")),
        ];

        let summary = dispatch_payslips(notifier.clone(), payslips).await;

        assert_eq!(
            summary,
            DispatchSummary {
                sent: 2,
                failed: 1,
                skipped: 1
            }
        );
        let mut sent = notifier.sent.lock().unwrap().clone();
        sent.sort();
        assert_eq!(sent, vec![1, 4]);
    }

    #[tokio::test]
    async fn test_dispatch_of_nothing() {
        let summary = dispatch_payslips(Arc::new(LogNotifier), vec![]).await;
        assert_eq!(summary, DispatchSummary::default());
    }

    #[test]
    fn test_payslip_content() {
        let slip = payslip(9, Some("asha@example.com"));

        assert_eq!(slip.subject(), "Payslip for 4/2025");
        assert!(slip.body().starts_with("Dear Employee 9,"));
        assert!(slip.body().contains("Net Salary: 28000"));
    }
}
