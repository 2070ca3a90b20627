//! Configuration loading for the payroll engine.
//!
//! This module loads engine settings and pay parameter sets from YAML
//! files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Trend window: {} months", config.settings().max_trend_months);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EmployeeSeed, EngineSettings, PayParameterFile, StatutoryReference};
