//! HTTP tests for daily/period reports, exports, and health checks

#[macro_use]
#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::test;
use chrono::{Duration, Utc};
use helpers::InMemorySaleRepository;
use rust_decimal_macros::dec;
use saleslog::Sale;
use serde_json::Value;
use std::sync::Arc;

fn march_sales() -> Vec<Sale> {
    vec![
        helpers::sale("m4", "2024-03-04", 12, 0, dec!(1000)),
        helpers::sale("m5-a", "2024-03-05", 9, 15, dec!(10)),
        helpers::sale("m5-b", "2024-03-05", 9, 45, dec!(20)),
        helpers::sale("m5-c", "2024-03-05", 14, 0, dec!(30)),
        helpers::sale("april", "2024-04-01", 10, 0, dec!(99)),
    ]
}

fn export_sales() -> Vec<Sale> {
    let first = helpers::sale("a", "2024-01-01", 10, 0, dec!(5));
    let mut second = helpers::sale("b", "2024-01-02", 11, 0, dec!(10.5));
    second.order_id = Some("A1".to_string());
    second.comment = Some("x".to_string());
    vec![second, first]
}

#[actix_web::test]
async fn test_reports_require_login() {
    let repository = Arc::new(InMemorySaleRepository::with_sales(march_sales()));
    let app = init_test_app!(repository);

    for uri in [
        "/api/reports/daily?date=2024-03-05",
        "/api/reports/period?start_date=2024-03-01&end_date=2024-03-31",
        "/api/reports/export?start_date=2024-03-01&end_date=2024-03-31",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401, "{} should require login", uri);
    }
}

#[actix_web::test]
async fn test_daily_report() {
    let repository = Arc::new(InMemorySaleRepository::with_sales(march_sales()));
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);

    let req = test::TestRequest::get()
        .uri("/api/reports/daily?date=2024-03-05")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["date"], "2024-03-05");

    let stats = &body["stats"];
    assert_eq!(stats["count"], 3);
    assert_eq!(stats["total_amount"], "60.00");
    assert_eq!(stats["average_check"], "20.00");
    assert_eq!(stats["min_value"], "10.00");
    assert_eq!(stats["max_value"], "30.00");
    assert_eq!(stats["median_value"], "20.00");

    let sales = body["sales"].as_array().unwrap();
    assert_eq!(sales.len(), 3);
    assert_eq!(sales[0]["id"], "m5-c");

    let hourly = body["charts"]["hourly"].as_array().unwrap();
    assert_eq!(hourly.len(), 24);
    assert_eq!(hourly[9]["label"], "9:00");
    assert_eq!(hourly[9]["count"], 2);
    assert_eq!(hourly[9]["total"], "30.00");
    assert_eq!(hourly[14]["count"], 1);
    assert_eq!(hourly[0]["count"], 0);

    let distribution = body["charts"]["price_distribution"].as_array().unwrap();
    assert_eq!(distribution.len(), 1);
    assert_eq!(distribution[0]["range_start"], "0");
    assert_eq!(distribution[0]["range_end"], "1000");
    assert_eq!(distribution[0]["count"], 3);
}

#[actix_web::test]
async fn test_daily_report_for_empty_day() {
    let repository = Arc::new(InMemorySaleRepository::with_sales(march_sales()));
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);

    let req = test::TestRequest::get()
        .uri("/api/reports/daily?date=2024-02-29")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["stats"]["count"], 0);
    assert_eq!(body["stats"]["total_amount"], "0.00");
    assert_eq!(body["stats"]["median_value"], "0.00");
    assert!(body["sales"].as_array().unwrap().is_empty());
    assert!(body["charts"]["price_distribution"].as_array().unwrap().is_empty());
    assert_eq!(body["charts"]["hourly"].as_array().unwrap().len(), 24);
}

#[actix_web::test]
async fn test_period_report() {
    let repository = Arc::new(InMemorySaleRepository::with_sales(march_sales()));
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);

    let req = test::TestRequest::get()
        .uri("/api/reports/period?start_date=2024-03-01&end_date=2024-03-31")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["start_date"], "2024-03-01");
    assert_eq!(body["end_date"], "2024-03-31");
    assert_eq!(body["days_with_sales"], 2);
    assert_eq!(body["stats"]["count"], 4);
    assert_eq!(body["stats"]["total_amount"], "1060.00");
    assert_eq!(body["stats"]["median_value"], "25.00");

    let trend = body["charts"]["trend"].as_array().unwrap();
    let trend_dates: Vec<&str> = trend.iter().map(|p| p["date"].as_str().unwrap()).collect();
    assert_eq!(trend_dates, vec!["2024-03-04", "2024-03-05"]);
    assert_eq!(trend[1]["total"], "60.00");
    assert_eq!(trend[1]["average"], "20.00");

    let distribution = body["charts"]["price_distribution"].as_array().unwrap();
    assert_eq!(distribution.len(), 2);
    assert_eq!(distribution[0]["count"], 3);
    assert_eq!(distribution[1]["range_start"], "1000");
    assert_eq!(distribution[1]["range_end"], "2000");
    assert_eq!(distribution[1]["count"], 1);
}

#[actix_web::test]
async fn test_period_report_rejects_bad_ranges() {
    let repository = Arc::new(InMemorySaleRepository::with_sales(march_sales()));
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);

    let tomorrow = (Utc::now() + Duration::days(1)).date_naive();
    let bad_queries = vec![
        "start_date=2024-03-31&end_date=2024-03-01".to_string(),
        format!("start_date=2024-03-01&end_date={}", tomorrow),
        "start_date=03/01/2024&end_date=2024-03-31".to_string(),
        "start_date=2024-03-01".to_string(),
    ];

    for query in bad_queries {
        let req = test::TestRequest::get()
            .uri(&format!("/api/reports/period?{}", query))
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "query '{}' should be rejected", query);
    }
}

#[actix_web::test]
async fn test_period_report_spanning_years() {
    let repository = Arc::new(InMemorySaleRepository::with_sales(march_sales()));
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);

    let req = test::TestRequest::get()
        .uri("/api/reports/period?start_date=2023-01-01&end_date=2024-12-31")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["stats"]["count"], 5);
    assert_eq!(body["days_with_sales"], 3);
}

#[actix_web::test]
async fn test_export_whole_days() {
    let repository = Arc::new(InMemorySaleRepository::with_sales(export_sales()));
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);

    let req = test::TestRequest::get()
        .uri("/api/reports/export?start_date=2024-01-01&end_date=2024-01-02")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    let body = test::read_body(resp).await;
    assert_eq!(
        std::str::from_utf8(&body).unwrap(),
        "2024-01-01\n-5.00-\n\n2024-01-02\nA1-10.50-x\n\n"
    );
}

#[actix_web::test]
async fn test_export_respects_time_window() {
    let repository = Arc::new(InMemorySaleRepository::with_sales(export_sales()));
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);

    // Starting after the first sale leaves only the second day.
    let req = test::TestRequest::get()
        .uri("/api/reports/export?start_date=2024-01-01&start_time=10:30&end_date=2024-01-02")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    assert_eq!(std::str::from_utf8(&body).unwrap(), "2024-01-02\nA1-10.50-x\n\n");

    // The end minute is inclusive.
    let req = test::TestRequest::get()
        .uri("/api/reports/export?start_date=2024-01-01&end_date=2024-01-01&end_time=10:00")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body = test::read_body(resp).await;
    assert_eq!(std::str::from_utf8(&body).unwrap(), "2024-01-01\n-5.00-\n\n");
}

#[actix_web::test]
async fn test_export_errors() {
    let repository = Arc::new(InMemorySaleRepository::with_sales(export_sales()));
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);

    let req = test::TestRequest::get()
        .uri("/api/reports/export?start_date=2023-06-01&end_date=2023-06-30")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("No sales found for the selected period"));

    for query in [
        "start_date=2024-01-01&end_date=2024-01-02&start_time=25:00",
        "start_date=2024-01-02&end_date=2024-01-01",
        "start_date=2024-01-01",
    ] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/reports/export?{}", query))
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "query '{}' should be rejected", query);
    }
}

#[actix_web::test]
async fn test_health_and_readiness() {
    let repository = Arc::new(InMemorySaleRepository::new());
    let app = init_test_app!(repository);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get().uri("/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ready"], true);

    repository.set_unavailable(true);
    let req = test::TestRequest::get().uri("/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["checks"]["database"], false);
}
