//! HTTP API module for the payroll engine.
//!
//! This module exposes generation, listing, correction and analytics as
//! REST endpoints scoped by company.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CostQuery, GenerateRequest, ListQuery, PeriodQuery, SummaryQuery, TrendsQuery};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
