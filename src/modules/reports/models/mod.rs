mod sales_report;

pub use sales_report::{
    ChartSeries, DailyReport, DailyTrendPoint, HourBucket, PeriodReport, PriceRangeBucket, Stats,
};
