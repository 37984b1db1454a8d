//! Saleslog: single-tenant point-of-sale logging service
//!
//! Records sales, and turns them into daily lists, period statistics, chart
//! series, and a plain-text export.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::reports::{ReportService, SalesAggregator, Stats};
pub use modules::sales::{Sale, SaleRepository};
