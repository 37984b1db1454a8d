pub mod controllers;
pub mod models;
pub mod services;

pub use models::{PeriodReport, Stats};
pub use services::{ReportService, SalesAggregator};
