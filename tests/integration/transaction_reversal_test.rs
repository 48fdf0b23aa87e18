// Reversals over HTTP: appended, never edited, netted out of reports and balances

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::StatusCode;
use actix_web::test;
use demdem_payouts::rates::RateTable;
use helpers::*;
use serde_json::{json, Value};

#[actix_web::test]
async fn test_reversal_nets_out_everywhere() {
    let app = init_app!(test_state(RateTable::default(), &[]));

    let sale: Value = test::call_and_read_body_json(
        &app,
        post(
            "/v1/transactions",
            ADMIN_KEY,
            TestDataFactory::sale_payload(ORGANIZER_ID, "Dakar Arena", "web_gateway", 10_000),
        )
        .to_request(),
    )
    .await;
    assert_eq!(sale["commission"], 500);
    assert_eq!(sale["gateway_fee"], 143);
    assert_eq!(sale["net_amount"], 9_357);
    let id = sale["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        post(&format!("/v1/transactions/{}/reverse", id), ADMIN_KEY, json!({})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let reversal: Value = test::read_body_json(resp).await;
    assert_eq!(reversal["gross_amount"], -10_000);
    assert_eq!(reversal["net_amount"], -9_357);
    assert_eq!(reversal["reverses"], id.as_str());

    // the original is untouched
    let original: Value =
        test::call_and_read_body_json(&app, get(&format!("/v1/transactions/{}", id), ADMIN_KEY).to_request()).await;
    assert_eq!(original, sale);

    let summary: Value =
        test::call_and_read_body_json(&app, get("/v1/reports/summary", ADMIN_KEY).to_request()).await;
    assert_eq!(summary["total_revenue"], 0);
    assert_eq!(summary["categories"]["ticketing_online"]["transaction_count"], 2);

    let balance: Value =
        test::call_and_read_body_json(&app, get("/v1/payouts/balance", ORGANIZER_KEY).to_request()).await;
    assert_eq!(balance["available"], 0);

    let ledger: Value =
        test::call_and_read_body_json(&app, get("/v1/transactions", ADMIN_KEY).to_request()).await;
    assert_eq!(ledger.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_double_reversal_conflicts() {
    let app = init_app!(test_state(RateTable::default(), &[]));

    let sale: Value = test::call_and_read_body_json(
        &app,
        post(
            "/v1/transactions",
            ADMIN_KEY,
            TestDataFactory::sale_payload(ORGANIZER_ID, "Dakar Arena", "offline_bulk", 10_000),
        )
        .to_request(),
    )
    .await;
    let uri = format!("/v1/transactions/{}/reverse", sale["id"].as_str().unwrap());

    let resp = test::call_service(&app, post(&uri, ADMIN_KEY, json!({})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let reversal: Value = test::read_body_json(resp).await;

    let resp = test::call_service(&app, post(&uri, ADMIN_KEY, json!({})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // a reversal cannot itself be reversed
    let resp = test::call_service(
        &app,
        post(
            &format!("/v1/transactions/{}/reverse", reversal["id"].as_str().unwrap()),
            ADMIN_KEY,
            json!({}),
        )
        .to_request(),
    )
    .await;
    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn test_unknown_transaction_and_organizer_access() {
    let app = init_app!(test_state(RateTable::default(), &[]));

    let resp = test::call_service(
        &app,
        post("/v1/transactions/missing/reverse", ADMIN_KEY, json!({})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        post(
            "/v1/transactions",
            ORGANIZER_KEY,
            TestDataFactory::sale_payload(ORGANIZER_ID, "Dakar Arena", "web_gateway", 1_000),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_import_legacy_document() {
    let app = init_app!(test_state(RateTable::default(), &[]));

    let resp = test::call_service(
        &app,
        post(
            "/v1/transactions/import",
            ADMIN_KEY,
            json!({
                "id": "legacy-42",
                "serviceType": "transport_intercity",
                "totalAmount": 3500.0,
                "partnerId": OTHER_ORGANIZER_ID,
                "partnerName": "Thiès Express",
                "createdAt": 1735725600000_i64
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let tx: Value = test::read_body_json(resp).await;
    assert_eq!(tx["commission"], 175);
    assert_eq!(tx["gateway_fee"], 50); // 3325 × 0.015 = 49.875
    assert_eq!(tx["net_amount"], 3_275);

    // same id twice
    let resp = test::call_service(
        &app,
        post(
            "/v1/transactions/import",
            ADMIN_KEY,
            json!({
                "id": "legacy-42",
                "serviceType": "transport_intercity",
                "amount": 3500,
                "partnerId": OTHER_ORGANIZER_ID,
                "createdAt": "2025-01-01"
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}
