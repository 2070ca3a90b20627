//! Access policy consumed by the payroll operations.
//!
//! The engine never decides who may do what. It asks an [`AccessPolicy`]
//! for a yes/no answer before each operation and fails with
//! [`EngineError::Forbidden`] on a no.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::CompanyId;

/// Operations guarded by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollAction {
    /// Run a payroll generation batch.
    GeneratePayroll,
    /// List payroll records.
    ReadPayroll,
    /// Correct an existing payroll record.
    UpdatePayroll,
    /// Read summaries, trends, cost analysis and compliance reports.
    ReadAnalytics,
}

impl PayrollAction {
    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayrollAction::GeneratePayroll => "GENERATE_PAYROLL",
            PayrollAction::ReadPayroll => "READ_PAYROLL",
            PayrollAction::UpdatePayroll => "UPDATE_PAYROLL",
            PayrollAction::ReadAnalytics => "READ_ANALYTICS",
        }
    }
}

impl fmt::Display for PayrollAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean outcome of an authorization decision made elsewhere.
pub trait AccessPolicy: Send + Sync {
    /// Returns true if `action` is allowed within `company_id`.
    fn is_permitted(&self, company_id: CompanyId, action: PayrollAction) -> bool;
}

/// Fails with [`EngineError::Forbidden`] unless `policy` permits `action`.
pub fn authorize(
    policy: &dyn AccessPolicy,
    company_id: CompanyId,
    action: PayrollAction,
) -> EngineResult<()> {
    if policy.is_permitted(company_id, action) {
        Ok(())
    } else {
        Err(EngineError::Forbidden {
            action: action.to_string(),
        })
    }
}

/// A fixed set of granted actions, applied to every company.
#[derive(Debug, Clone, Default)]
pub struct StaticPolicy {
    granted: HashSet<PayrollAction>,
}

impl StaticPolicy {
    /// Grants every action.
    pub fn allow_all() -> Self {
        Self::granting([
            PayrollAction::GeneratePayroll,
            PayrollAction::ReadPayroll,
            PayrollAction::UpdatePayroll,
            PayrollAction::ReadAnalytics,
        ])
    }

    /// Grants nothing.
    pub fn deny_all() -> Self {
        Self::default()
    }

    /// Grants exactly the given actions.
    pub fn granting(actions: impl IntoIterator<Item = PayrollAction>) -> Self {
        Self {
            granted: actions.into_iter().collect(),
        }
    }
}

impl AccessPolicy for StaticPolicy {
    fn is_permitted(&self, _company_id: CompanyId, action: PayrollAction) -> bool {
        self.granted.contains(&action)
    }
}
