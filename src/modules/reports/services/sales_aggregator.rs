use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::core::{money, BusinessTimezone};
use crate::modules::reports::models::{
    ChartSeries, DailyTrendPoint, HourBucket, PriceRangeBucket, Stats,
};
use crate::modules::sales::Sale;

/// Number of hour-of-day buckets
pub const HOURS_PER_DAY: usize = 24;

/// Smallest price bucket width; wider buckets are whole multiples of it
const PRICE_RANGE_UNIT: Decimal = Decimal::ONE_THOUSAND;

/// Price histograms aim for about this many buckets across the observed spread
const TARGET_PRICE_BUCKETS: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Pure statistics over sale lists.
///
/// Every operation is total: it never fails, never mutates its input, and
/// returns the same output for the same input.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesAggregator {
    timezone: BusinessTimezone,
}

impl SalesAggregator {
    /// `timezone` decides which local hour a `created_at` instant falls in
    pub fn new(timezone: BusinessTimezone) -> Self {
        Self { timezone }
    }

    /// Count, total, average, min, max, and median of the sale prices
    pub fn summarize(&self, sales: &[Sale]) -> Stats {
        if sales.is_empty() {
            return Stats::empty();
        }

        let count = sales.len();
        let mut prices: Vec<Decimal> = sales.iter().map(|s| s.price).collect();
        prices.sort();

        let total_amount: Decimal = prices.iter().sum();
        let median_value = if count % 2 == 0 {
            (prices[count / 2 - 1] + prices[count / 2]) / Decimal::TWO
        } else {
            prices[count / 2]
        };

        Stats {
            count,
            total_amount,
            average_check: total_amount / Decimal::from(count),
            min_value: prices[0],
            max_value: prices[count - 1],
            median_value,
        }
    }

    /// Partition by `date`; days iterate ascending, input order is kept within a day
    pub fn group_by_date<'a>(&self, sales: &'a [Sale]) -> BTreeMap<NaiveDate, Vec<&'a Sale>> {
        let mut groups: BTreeMap<NaiveDate, Vec<&'a Sale>> = BTreeMap::new();
        for sale in sales {
            groups.entry(sale.date).or_default().push(sale);
        }
        groups
    }

    /// Number of distinct days present in the list
    pub fn distinct_days(&self, sales: &[Sale]) -> usize {
        self.group_by_date(sales).len()
    }

    /// Render the copy/paste export text.
    ///
    /// For each day, ascending:
    ///
    /// ```text
    /// 2024-01-01
    /// {order_id}-{price:.2}-{comment}
    ///
    /// ```
    ///
    /// Missing `order_id`/`comment` render as empty strings. Hyphens inside
    /// them are not escaped, so the line cannot always be split back apart.
    pub fn format_export(&self, sales: &[Sale]) -> String {
        let mut text = String::new();

        for (date, day_sales) in self.group_by_date(sales) {
            // Writing to a String cannot fail.
            let _ = writeln!(text, "{}", date.format("%Y-%m-%d"));
            for sale in day_sales {
                let _ = writeln!(
                    text,
                    "{}-{}-{}",
                    sale.order_id_or_empty(),
                    money::format_amount(sale.price),
                    sale.comment_or_empty()
                );
            }
            text.push('\n');
        }

        text
    }

    /// Count and total per local hour of `created_at`; always 24 buckets
    pub fn bucket_by_hour(&self, sales: &[Sale]) -> Vec<HourBucket> {
        let mut buckets: Vec<HourBucket> = (0..HOURS_PER_DAY)
            .map(|hour| HourBucket {
                hour,
                count: 0,
                total: Decimal::ZERO,
            })
            .collect();

        for sale in sales {
            let bucket = &mut buckets[self.timezone.local_hour(sale.created_at)];
            bucket.count += 1;
            bucket.total += sale.price;
        }

        buckets
    }

    /// Histogram of prices with a data-driven bucket width.
    ///
    /// Width is `max(1000, ceil((max - min) / 5 / 1000) * 1000)`; a sale lands
    /// in bucket `floor(price / width)`. Only non-empty buckets are returned,
    /// ascending by `range_start`.
    pub fn bucket_by_price_range(&self, sales: &[Sale]) -> Vec<PriceRangeBucket> {
        let Some(range_size) = Self::price_range_size(sales) else {
            return Vec::new();
        };

        let mut buckets: BTreeMap<Decimal, PriceRangeBucket> = BTreeMap::new();
        for sale in sales {
            let range_start = (sale.price / range_size).floor() * range_size;
            let bucket = buckets
                .entry(range_start)
                .or_insert_with(|| PriceRangeBucket {
                    range_start,
                    range_end: range_start + range_size,
                    count: 0,
                    total: Decimal::ZERO,
                });
            bucket.count += 1;
            bucket.total += sale.price;
        }

        buckets.into_values().collect()
    }

    /// Bucket width used by `bucket_by_price_range`; `None` for an empty list
    pub fn price_range_size(sales: &[Sale]) -> Option<Decimal> {
        let min_price = sales.iter().map(|s| s.price).min()?;
        let max_price = sales.iter().map(|s| s.price).max()?;

        let spread_units = ((max_price - min_price) / TARGET_PRICE_BUCKETS / PRICE_RANGE_UNIT).ceil();
        Some((spread_units * PRICE_RANGE_UNIT).max(PRICE_RANGE_UNIT))
    }

    /// Per-day total, count, and average, ascending by date
    pub fn daily_trend(&self, sales: &[Sale]) -> Vec<DailyTrendPoint> {
        self.group_by_date(sales)
            .into_iter()
            .map(|(date, day_sales)| {
                let count = day_sales.len();
                let total: Decimal = day_sales.iter().map(|s| s.price).sum();
                DailyTrendPoint {
                    date,
                    total,
                    count,
                    average: money::round_amount(total / Decimal::from(count)),
                }
            })
            .collect()
    }

    /// All chart series at once
    pub fn chart_series(&self, sales: &[Sale]) -> ChartSeries {
        ChartSeries {
            trend: self.daily_trend(sales),
            price_distribution: self.bucket_by_price_range(sales),
            hourly: self.bucket_by_hour(sales),
        }
    }
}
