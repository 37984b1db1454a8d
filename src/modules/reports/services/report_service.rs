use chrono::{Duration, NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::{AppError, BusinessTimezone, Result};
use crate::modules::reports::models::{DailyReport, PeriodReport};
use crate::modules::reports::services::SalesAggregator;
use crate::modules::sales::SaleRepository;

/// Local time window for an export.
///
/// Both ends are inclusive to the minute: `00:00`..`23:59` covers whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportWindow {
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
}

impl ExportWindow {
    pub fn whole_days(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            start_time: NaiveTime::MIN,
            end_date,
            end_time: NaiveTime::from_hms_opt(23, 59, 0).expect("valid time"),
        }
    }
}

/// Fetches sales through the repository and runs them through the aggregator
pub struct ReportService {
    repository: Arc<dyn SaleRepository>,
    timezone: BusinessTimezone,
    aggregator: SalesAggregator,
}

impl ReportService {
    pub fn new(repository: Arc<dyn SaleRepository>, timezone: BusinessTimezone) -> Self {
        Self {
            repository,
            timezone,
            aggregator: SalesAggregator::new(timezone),
        }
    }

    /// Sales list, stats, and chart series for one day (local today when absent)
    pub async fn daily_report(&self, date: Option<NaiveDate>) -> Result<DailyReport> {
        let date = date.unwrap_or_else(|| self.timezone.today());
        let sales = self.repository.list_by_date(date).await?;

        let stats = self.aggregator.summarize(&sales);
        let charts = self.aggregator.chart_series(&sales);

        info!(date = %date, count = stats.count, "Daily report generated");

        Ok(DailyReport {
            date,
            sales,
            stats,
            charts,
        })
    }

    /// Stats and chart series for an inclusive day range
    ///
    /// # Errors
    /// Validation error when the range is inverted or ends in the future
    pub async fn period_report(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PeriodReport> {
        self.validate_date_range(start_date, end_date)?;

        let sales = self
            .repository
            .list_by_date_range(start_date, end_date)
            .await?;

        let report = PeriodReport {
            start_date,
            end_date,
            stats: self.aggregator.summarize(&sales),
            days_with_sales: self.aggregator.distinct_days(&sales),
            charts: self.aggregator.chart_series(&sales),
        };

        if report.is_empty() {
            warn!(
                "Empty period report generated for {} to {}",
                start_date, end_date
            );
        } else {
            info!(
                start = %start_date,
                end = %end_date,
                count = report.stats.count,
                days = report.days_with_sales,
                "Period report generated"
            );
        }

        Ok(report)
    }

    /// Export text for sales recorded inside a local time window
    ///
    /// # Errors
    /// `NotFound` when the window holds no sales
    pub async fn export(&self, window: ExportWindow) -> Result<String> {
        let from = self.timezone.to_utc(window.start_date, window.start_time);
        // The end minute is inclusive, so stop just before the next one.
        let until = self.timezone.to_utc(window.end_date, window.end_time) + Duration::minutes(1);

        if from >= until {
            return Err(AppError::validation(
                "Export start must be before its end",
            ));
        }

        let sales = self
            .repository
            .list_by_created_at_range(from, until)
            .await?;

        if sales.is_empty() {
            return Err(AppError::not_found("No sales found for the selected period"));
        }

        info!(
            from = %from,
            until = %until,
            count = sales.len(),
            "Sales export generated"
        );

        Ok(self.aggregator.format_export(&sales))
    }

    /// Validate that a date range is reasonable
    pub fn validate_date_range(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<()> {
        if start_date > end_date {
            return Err(AppError::validation(format!(
                "start_date ({}) must be before or equal to end_date ({})",
                start_date, end_date
            )));
        }

        let today = self.timezone.today();
        if end_date > today {
            return Err(AppError::validation(format!(
                "end_date cannot be in the future (today is {})",
                today
            )));
        }

        Ok(())
    }
}
