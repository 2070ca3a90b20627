//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::analytics::PayrollAnalytics;
use crate::config::ConfigLoader;
use crate::directory::{EmployeeDirectory, InMemoryDirectory};
use crate::generation::PayrollCoordinator;
use crate::notification::PayslipNotifier;
use crate::policy::AccessPolicy;
use crate::store::PayrollStore;

/// Shared application state.
///
/// Holds the generation coordinator and the analytics service; both are
/// cheap to clone and share their collaborators.
#[derive(Clone)]
pub struct AppState {
    coordinator: PayrollCoordinator,
    analytics: PayrollAnalytics,
}

impl AppState {
    /// Creates a new application state from its services.
    pub fn new(coordinator: PayrollCoordinator, analytics: PayrollAnalytics) -> Self {
        Self {
            coordinator,
            analytics,
        }
    }

    /// Wires both services from a loaded configuration.
    ///
    /// The employee seed of the configuration is loaded into an in-memory
    /// directory; the parameter registry backs resolution and compliance.
    pub fn from_config(
        config: ConfigLoader,
        store: Arc<dyn PayrollStore>,
        policy: Arc<dyn AccessPolicy>,
        notifier: Arc<dyn PayslipNotifier>,
    ) -> Self {
        let (settings, parameters, employees) = config.into_parts();
        let directory: Arc<dyn EmployeeDirectory> =
            Arc::new(InMemoryDirectory::with_employees(employees));
        let parameters = Arc::new(parameters);

        let coordinator = PayrollCoordinator::new(
            directory,
            parameters.clone(),
            store.clone(),
            policy.clone(),
            notifier,
            settings.clone(),
        );
        let analytics = PayrollAnalytics::new(store, parameters, policy, settings);
        Self::new(coordinator, analytics)
    }

    /// Returns the generation coordinator.
    pub fn coordinator(&self) -> &PayrollCoordinator {
        &self.coordinator
    }

    /// Returns the analytics service.
    pub fn analytics(&self) -> &PayrollAnalytics {
        &self.analytics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
