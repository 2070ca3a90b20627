//! Payroll Engine for multi-tenant monthly payroll
//!
//! This crate resolves effective-dated pay parameters, computes salary
//! components and statutory deductions, generates one payroll record per
//! employee and period for a company, supports corrections of stored
//! records and aggregates the ledger into summaries, trends, cost
//! breakdowns and compliance reports.

#![warn(missing_docs)]

pub mod analytics;
pub mod api;
pub mod calculation;
pub mod config;
pub mod directory;
pub mod error;
pub mod generation;
pub mod models;
pub mod notification;
pub mod policy;
pub mod store;
