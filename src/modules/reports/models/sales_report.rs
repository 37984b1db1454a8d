use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::modules::sales::Sale;

/// Summary statistics over a list of sales.
///
/// All amounts are zero when the list is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    /// Number of sales
    pub count: usize,
    /// Sum of prices
    pub total_amount: Decimal,
    /// `total_amount / count`
    pub average_check: Decimal,
    pub min_value: Decimal,
    pub max_value: Decimal,
    /// Middle price; mean of the two middle prices for even counts
    pub median_value: Decimal,
}

impl Stats {
    pub fn empty() -> Self {
        Self {
            count: 0,
            total_amount: Decimal::ZERO,
            average_check: Decimal::ZERO,
            min_value: Decimal::ZERO,
            max_value: Decimal::ZERO,
            median_value: Decimal::ZERO,
        }
    }
}

/// Sales recorded during one local hour of the day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourBucket {
    /// Hour of day, 0-23
    pub hour: usize,
    pub count: usize,
    pub total: Decimal,
}

/// Sales whose price falls in `[range_start, range_end)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRangeBucket {
    pub range_start: Decimal,
    pub range_end: Decimal,
    pub count: usize,
    pub total: Decimal,
}

/// Per-day totals for the sales trend series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrendPoint {
    pub date: NaiveDate,
    pub total: Decimal,
    pub count: usize,
    /// `total / count`, rounded to two decimals
    pub average: Decimal,
}

/// Chart series derived from a sale list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub trend: Vec<DailyTrendPoint>,
    pub price_distribution: Vec<PriceRangeBucket>,
    pub hourly: Vec<HourBucket>,
}

/// Everything shown for a single day
#[derive(Debug, Clone)]
pub struct DailyReport {
    pub date: NaiveDate,
    /// Newest first
    pub sales: Vec<Sale>,
    pub stats: Stats,
    pub charts: ChartSeries,
}

/// Aggregates over an inclusive day range
#[derive(Debug, Clone)]
pub struct PeriodReport {
    /// Start date of the reporting period (inclusive)
    pub start_date: NaiveDate,
    /// End date of the reporting period (inclusive)
    pub end_date: NaiveDate,
    pub stats: Stats,
    /// Number of distinct days that had at least one sale
    pub days_with_sales: usize,
    pub charts: ChartSeries,
}

impl PeriodReport {
    pub fn is_empty(&self) -> bool {
        self.stats.count == 0
    }
}
