use actix_web::{http::header::ContentType, web, HttpResponse};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, AppError, BusinessTimezone, Result};
use crate::modules::reports::models::{
    ChartSeries, DailyReport, DailyTrendPoint, HourBucket, PeriodReport, PriceRangeBucket, Stats,
};
use crate::modules::reports::services::{ExportWindow, ReportService};
use crate::modules::sales::controllers::SaleResponse;
use crate::modules::sales::SaleRepository;

/// Query parameters for the daily report endpoint
#[derive(Debug, Deserialize)]
pub struct DailyReportQuery {
    /// Day to report on (format: YYYY-MM-DD), defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Query parameters for the period report endpoint
#[derive(Debug, Deserialize)]
pub struct PeriodReportQuery {
    /// Start date of reporting period (inclusive, format: YYYY-MM-DD)
    pub start_date: String,
    /// End date of reporting period (inclusive, format: YYYY-MM-DD)
    pub end_date: String,
}

/// Query parameters for the export endpoint
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub start_date: String,
    pub end_date: String,
    /// Local time, HH:MM (default 00:00)
    #[serde(default)]
    pub start_time: Option<String>,
    /// Local time, HH:MM (default 23:59)
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Stats with money rendered as two-decimal strings
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub count: usize,
    pub total_amount: String,
    pub average_check: String,
    pub min_value: String,
    pub max_value: String,
    pub median_value: String,
}

impl From<Stats> for StatsResponse {
    fn from(stats: Stats) -> Self {
        Self {
            count: stats.count,
            total_amount: money::format_amount(stats.total_amount),
            average_check: money::format_amount(stats.average_check),
            min_value: money::format_amount(stats.min_value),
            max_value: money::format_amount(stats.max_value),
            median_value: money::format_amount(stats.median_value),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrendPointResponse {
    pub date: NaiveDate,
    pub total: String,
    pub count: usize,
    pub average: String,
}

#[derive(Debug, Serialize)]
pub struct HourBucketResponse {
    pub hour: usize,
    pub label: String,
    pub count: usize,
    pub total: String,
}

#[derive(Debug, Serialize)]
pub struct PriceRangeResponse {
    pub range_start: String,
    pub range_end: String,
    pub count: usize,
    pub total: String,
}

#[derive(Debug, Serialize)]
pub struct ChartSeriesResponse {
    pub trend: Vec<TrendPointResponse>,
    pub price_distribution: Vec<PriceRangeResponse>,
    pub hourly: Vec<HourBucketResponse>,
}

impl From<DailyTrendPoint> for TrendPointResponse {
    fn from(point: DailyTrendPoint) -> Self {
        Self {
            date: point.date,
            total: money::format_amount(point.total),
            count: point.count,
            average: money::format_amount(point.average),
        }
    }
}

impl From<HourBucket> for HourBucketResponse {
    fn from(bucket: HourBucket) -> Self {
        Self {
            hour: bucket.hour,
            label: format!("{}:00", bucket.hour),
            count: bucket.count,
            total: money::format_amount(bucket.total),
        }
    }
}

impl From<PriceRangeBucket> for PriceRangeResponse {
    fn from(bucket: PriceRangeBucket) -> Self {
        Self {
            range_start: whole_amount(bucket.range_start),
            range_end: whole_amount(bucket.range_end),
            count: bucket.count,
            total: money::format_amount(bucket.total),
        }
    }
}

impl From<ChartSeries> for ChartSeriesResponse {
    fn from(charts: ChartSeries) -> Self {
        Self {
            trend: charts.trend.into_iter().map(Into::into).collect(),
            price_distribution: charts
                .price_distribution
                .into_iter()
                .map(Into::into)
                .collect(),
            hourly: charts.hourly.into_iter().map(Into::into).collect(),
        }
    }
}

// Bucket bounds are whole multiples of the bucket width.
fn whole_amount(amount: Decimal) -> String {
    amount.trunc().normalize().to_string()
}

#[derive(Debug, Serialize)]
pub struct DailyReportResponse {
    pub date: NaiveDate,
    pub stats: StatsResponse,
    pub sales: Vec<SaleResponse>,
    pub charts: ChartSeriesResponse,
}

impl From<DailyReport> for DailyReportResponse {
    fn from(report: DailyReport) -> Self {
        Self {
            date: report.date,
            stats: report.stats.into(),
            sales: report.sales.into_iter().map(SaleResponse::from).collect(),
            charts: report.charts.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PeriodReportResponse {
    pub start_date: String, // Format: YYYY-MM-DD
    pub end_date: String,   // Format: YYYY-MM-DD
    pub days_with_sales: usize,
    pub stats: StatsResponse,
    pub charts: ChartSeriesResponse,
}

impl From<PeriodReport> for PeriodReportResponse {
    fn from(report: PeriodReport) -> Self {
        Self {
            start_date: report.start_date.format("%Y-%m-%d").to_string(),
            end_date: report.end_date.format("%Y-%m-%d").to_string(),
            days_with_sales: report.days_with_sales,
            stats: report.stats.into(),
            charts: report.charts.into(),
        }
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!(
            "Invalid {} format: '{}'. Expected YYYY-MM-DD",
            field, value
        ))
    })
}

fn parse_time(field: &str, value: Option<&str>, default: NaiveTime) -> Result<NaiveTime> {
    match value {
        None => Ok(default),
        Some(value) => NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| {
            AppError::validation(format!(
                "Invalid {} format: '{}'. Expected HH:MM",
                field, value
            ))
        }),
    }
}

fn service(
    repository: &web::Data<dyn SaleRepository>,
    timezone: &web::Data<BusinessTimezone>,
) -> ReportService {
    ReportService::new(repository.clone().into_inner(), *timezone.get_ref())
}

/// GET /api/reports/daily?date=YYYY-MM-DD
pub async fn get_daily_report(
    repository: web::Data<dyn SaleRepository>,
    timezone: web::Data<BusinessTimezone>,
    query: web::Query<DailyReportQuery>,
) -> Result<HttpResponse> {
    let report = service(&repository, &timezone)
        .daily_report(query.date)
        .await?;

    Ok(HttpResponse::Ok().json(DailyReportResponse::from(report)))
}

/// GET /api/reports/period?start_date=&end_date=
pub async fn get_period_report(
    repository: web::Data<dyn SaleRepository>,
    timezone: web::Data<BusinessTimezone>,
    query: web::Query<PeriodReportQuery>,
) -> Result<HttpResponse> {
    let start_date = parse_date("start_date", &query.start_date)?;
    let end_date = parse_date("end_date", &query.end_date)?;

    let report = service(&repository, &timezone)
        .period_report(start_date, end_date)
        .await?;

    Ok(HttpResponse::Ok().json(PeriodReportResponse::from(report)))
}

/// GET /api/reports/export?start_date=&end_date=&start_time=&end_time=
///
/// Responds with the export text as `text/plain`.
pub async fn get_export(
    repository: web::Data<dyn SaleRepository>,
    timezone: web::Data<BusinessTimezone>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse> {
    let start_date = parse_date("start_date", &query.start_date)?;
    let end_date = parse_date("end_date", &query.end_date)?;
    let defaults = ExportWindow::whole_days(start_date, end_date);

    let window = ExportWindow {
        start_date,
        start_time: parse_time("start_time", query.start_time.as_deref(), defaults.start_time)?,
        end_date,
        end_time: parse_time("end_time", query.end_time.as_deref(), defaults.end_time)?,
    };

    let text = service(&repository, &timezone).export(window).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(text))
}

/// Configure routes for reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/daily", web::get().to(get_daily_report))
            .route("/period", web::get().to(get_period_report))
            .route("/export", web::get().to(get_export)),
    );
}
