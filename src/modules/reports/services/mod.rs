mod report_service;
mod sales_aggregator;

pub use report_service::{ExportWindow, ReportService};
pub use sales_aggregator::{SalesAggregator, HOURS_PER_DAY};
