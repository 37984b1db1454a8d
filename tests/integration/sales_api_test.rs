//! HTTP tests for recording, listing, and deleting sales

#[macro_use]
#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::test;
use chrono::{Duration, Utc};
use helpers::InMemorySaleRepository;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;

#[actix_web::test]
async fn test_sales_routes_require_login() {
    let repository = Arc::new(InMemorySaleRepository::new());
    let app = init_test_app!(repository);

    let req = test::TestRequest::get().uri("/api/sales").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::post()
        .uri("/api/sales")
        .set_json(json!({ "price": "100" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    assert!(repository.snapshot().is_empty());
}

#[actix_web::test]
async fn test_create_sale() {
    let repository = Arc::new(InMemorySaleRepository::new());
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);

    let req = test::TestRequest::post()
        .uri("/api/sales")
        .cookie(cookie)
        .set_json(json!({
            "price": "1500.5",
            "comment": "  ",
            "order_id": "A-17",
            "date": "2024-03-05",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["price"], "1500.50");
    assert_eq!(body["order_id"], "A-17");
    assert_eq!(body["date"], "2024-03-05");
    assert!(body["comment"].is_null(), "blank comment is stored as null");

    let stored = repository.snapshot();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, body["id"].as_str().unwrap());
    assert_eq!(stored[0].price, dec!(1500.50));
}

#[actix_web::test]
async fn test_create_sale_defaults_to_today() {
    let repository = Arc::new(InMemorySaleRepository::new());
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);

    let req = test::TestRequest::post()
        .uri("/api/sales")
        .cookie(cookie)
        .set_json(json!({ "price": "250" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let stored = repository.snapshot();
    assert_eq!(stored[0].date, Utc::now().date_naive());
}

#[actix_web::test]
async fn test_create_sale_rejects_invalid_input() {
    let repository = Arc::new(InMemorySaleRepository::new());
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);

    let tomorrow = (Utc::now() + Duration::days(1)).date_naive();
    let invalid_payloads = vec![
        json!({ "price": "0" }),
        json!({ "price": "-10" }),
        json!({ "price": "10.001" }),
        json!({ "price": "10", "date": tomorrow.to_string() }),
        json!({ "comment": "no price" }),
    ];

    for payload in invalid_payloads {
        let req = test::TestRequest::post()
            .uri("/api/sales")
            .cookie(cookie.clone())
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "payload {} should be rejected", payload);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], 400);
    }

    assert!(repository.snapshot().is_empty());
}

#[actix_web::test]
async fn test_list_daily_sales_newest_first() {
    let repository = Arc::new(InMemorySaleRepository::with_sales(vec![
        helpers::sale("early", "2024-03-05", 9, 0, dec!(100)),
        helpers::sale("late", "2024-03-05", 17, 30, dec!(200)),
        helpers::sale("other-day", "2024-03-04", 12, 0, dec!(300)),
    ]));
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);

    let req = test::TestRequest::get()
        .uri("/api/sales?date=2024-03-05")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["date"], "2024-03-05");
    let ids: Vec<&str> = body["sales"]
        .as_array()
        .unwrap()
        .iter()
        .map(|sale| sale["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["late", "early"]);

    let req = test::TestRequest::get()
        .uri("/api/sales?date=05.03.2024")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_delete_sale() {
    let repository = Arc::new(InMemorySaleRepository::with_sales(vec![helpers::sale(
        "s-1",
        "2024-03-05",
        9,
        0,
        dec!(100),
    )]));
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);

    let req = test::TestRequest::delete()
        .uri("/api/sales/s-1")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);
    assert!(repository.snapshot().is_empty());

    let req = test::TestRequest::delete()
        .uri("/api/sales/s-1")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_store_failure_is_hidden_from_clients() {
    let repository = Arc::new(InMemorySaleRepository::new());
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);
    repository.set_unavailable(true);

    let req = test::TestRequest::get()
        .uri("/api/sales?date=2024-03-05")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Database error");
}

#[actix_web::test]
async fn test_create_failure_does_not_leak_store_error() {
    let repository = Arc::new(InMemorySaleRepository::new());
    let app = init_test_app!(repository);
    let cookie = login_cookie!(&app);
    repository.set_unavailable(true);

    let req = test::TestRequest::post()
        .uri("/api/sales")
        .cookie(cookie)
        .set_json(json!({ "price": "120", "date": "2024-03-05" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Database error");
    assert_eq!(body["error"]["code"], 500);
}
