// Financial summary, partner report and CSV exports over HTTP

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Utc;
use demdem_payouts::rates::RateTable;
use helpers::*;
use serde_json::Value;

#[actix_web::test]
async fn test_summary_splits_ticketing_and_transport() {
    let app = init_app!(test_state(RateTable::default(), &[]));

    for (partner, name, channel, gross) in [
        (ORGANIZER_ID, "Dakar Arena", "web_gateway", 10_000),
        (ORGANIZER_ID, "Dakar Arena", "offline_bulk", 20_000),
        (OTHER_ORGANIZER_ID, "COSAMA", "transport_maritime", 5_000),
        (OTHER_ORGANIZER_ID, "Abonnement", "transport_pass", 15_000),
    ] {
        let resp = test::call_service(
            &app,
            post(
                "/v1/transactions",
                ADMIN_KEY,
                TestDataFactory::sale_payload(partner, name, channel, gross),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let summary: Value =
        test::call_and_read_body_json(&app, get("/v1/reports/summary", ADMIN_KEY).to_request()).await;

    assert_eq!(summary["total_revenue"], 50_000);
    assert_eq!(summary["ticketing"]["gross_amount"], 30_000);
    assert_eq!(summary["transport"]["gross_amount"], 20_000);
    assert_eq!(summary["categories"]["ticketing_bulk"]["gateway_fee"], 0);
    assert_eq!(summary["categories"]["subscriptions"]["gross_amount"], 15_000);
    assert_eq!(summary["categories"]["intercity"]["transaction_count"], 0);

    // identical on a second call
    let again: Value =
        test::call_and_read_body_json(&app, get("/v1/reports/summary", ADMIN_KEY).to_request()).await;
    assert_eq!(summary, again);
}

#[actix_web::test]
async fn test_partner_export_is_a_quoted_csv_attachment() {
    let app = init_app!(test_state(RateTable::default(), &[]));

    for (name, gross) in [("Festival, Saint-Louis", 10_000), ("Dakar Arena", 4_000)] {
        test::call_service(
            &app,
            post(
                "/v1/transactions",
                ADMIN_KEY,
                TestDataFactory::sale_payload(ORGANIZER_ID, name, "web_gateway", gross),
            )
            .to_request(),
        )
        .await;
    }

    let resp = test::call_service(&app, get("/v1/reports/partners/export", ADMIN_KEY).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/csv"));

    let expected_name = format!(
        "{}_{}.csv",
        EXPORT_PREFIX,
        Utc::now().date_naive().format("%Y-%m-%d")
    );
    let disposition = resp
        .headers()
        .get(CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains(&expected_name));

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "partner_name,gross_amount,commission,gateway_fee,net_amount,transaction_count"
    );
    assert_eq!(lines[1], "Dakar Arena,4000,200,57,3743,1");
    assert_eq!(lines[2], "\"Festival, Saint-Louis\",10000,500,143,9357,1");
}

#[actix_web::test]
async fn test_empty_export_still_has_header() {
    let app = init_app!(test_state(RateTable::default(), &[]));

    let body = test::call_and_read_body(
        &app,
        get("/v1/reports/partners/export?start_date=2030-01-01", ADMIN_KEY).to_request(),
    )
    .await;

    assert_eq!(
        std::str::from_utf8(&body).unwrap().trim_end(),
        "partner_name,gross_amount,commission,gateway_fee,net_amount,transaction_count"
    );
}

#[actix_web::test]
async fn test_partner_report_fee_basis_and_period() {
    let app = init_app!(test_state(RateTable::default(), &[]));

    for channel in ["web_gateway", "offline_bulk"] {
        test::call_service(
            &app,
            post(
                "/v1/transactions",
                ADMIN_KEY,
                TestDataFactory::sale_payload(ORGANIZER_ID, "Dakar Arena", channel, 10_000),
            )
            .to_request(),
        )
        .await;
    }

    let recorded: Value =
        test::call_and_read_body_json(&app, get("/v1/reports/partners", ADMIN_KEY).to_request()).await;
    assert_eq!(recorded[0]["gateway_fee"], 143);
    assert_eq!(recorded[0]["net_amount"], 18_857);

    let flat: Value = test::call_and_read_body_json(
        &app,
        get("/v1/reports/partners?basis=flat_on_gross", ADMIN_KEY).to_request(),
    )
    .await;
    assert_eq!(flat[0]["commission"], 1_000);
    assert_eq!(flat[0]["gateway_fee"], 300);
    assert_eq!(flat[0]["net_amount"], 18_700);

    let resp = test::call_service(
        &app,
        get("/v1/reports/partners?start_date=2025-02-01&end_date=2025-01-01", ADMIN_KEY).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, get("/v1/reports/summary", ORGANIZER_KEY).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_payout_export() {
    let app = init_app!(test_state(RateTable::default(), &[]));

    test::call_service(
        &app,
        post(
            "/v1/transactions",
            ADMIN_KEY,
            TestDataFactory::sale_payload(ORGANIZER_ID, "Dakar Arena", "offline_bulk", 10_000),
        )
        .to_request(),
    )
    .await;
    test::call_service(
        &app,
        post("/v1/payouts", ORGANIZER_KEY, TestDataFactory::payout_payload(5_000)).to_request(),
    )
    .await;

    let body = test::call_and_read_body(&app, get("/v1/payouts/export?status=pending", ADMIN_KEY).to_request()).await;
    let text = std::str::from_utf8(&body).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("id,organizer_id,amount_requested,technical_fees,net_amount,status"));
    assert!(lines[1].contains(&format!(",{},5000,75,4925,pending,wave,", ORGANIZER_ID)));
}
