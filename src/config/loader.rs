//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! settings and pay parameter sets from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::directory::ParameterRegistry;
use crate::error::{EngineError, EngineResult};
use crate::models::Employee;

use super::types::{EmployeeSeed, EngineSettings, PayParameterFile};

/// Loads the engine configuration from a directory.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml          # Engine settings
/// ├── employees.yaml       # Optional employee seed for the in-memory directory
/// └── pay_parameters/
///     ├── company_1.yaml   # Pay parameter sets, any number of files
///     └── company_2.yaml
/// ```
///
/// Every parameter set is validated and registered; two sets with the same
/// company, scope and effective date are rejected.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Minimum wage: {}", loader.settings().minimum_wage);
/// println!("Parameter sets: {}", loader.parameters().len());
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    settings: EngineSettings,
    parameters: ParameterRegistry,
    employees: Vec<Employee>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `engine.yaml` or the `pay_parameters` directory is missing
    /// - Any file contains invalid YAML
    /// - Any setting or parameter set fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;
        settings.validate()?;

        let parameters = ParameterRegistry::new();
        for file in Self::parameter_files(&path.join("pay_parameters"))? {
            let contents = Self::load_yaml::<PayParameterFile>(&file)?;
            for parameter in contents.parameters {
                parameters.register(parameter)?;
            }
        }

        let employees_path = path.join("employees.yaml");
        let employees = if employees_path.exists() {
            Self::load_yaml::<EmployeeSeed>(&employees_path)?.employees
        } else {
            Vec::new()
        };

        info!(
            path = %path.display(),
            parameter_sets = parameters.len(),
            employees = employees.len(),
            "Loaded payroll configuration"
        );

        Ok(Self {
            settings,
            parameters,
            employees,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Lists the YAML files of the parameter directory in name order.
    fn parameter_files(dir: &Path) -> EngineResult<Vec<PathBuf>> {
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                files.push(path);
            }
        }
        files.sort();

        Ok(files)
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the registered pay parameter sets.
    pub fn parameters(&self) -> &ParameterRegistry {
        &self.parameters
    }

    /// Returns the employee seed, empty when no `employees.yaml` exists.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Splits the loader into its parts.
    pub fn into_parts(self) -> (EngineSettings, ParameterRegistry, Vec<Employee>) {
        (self.settings, self.parameters, self.employees)
    }
}
