// Payout request lifecycle over HTTP: silos, balance checks, transitions

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::StatusCode;
use actix_web::test;
use demdem_payouts::rates::RateTable;
use helpers::*;
use serde_json::{json, Value};

fn sale(gross: i64) -> Value {
    TestDataFactory::sale_payload(ORGANIZER_ID, "Dakar Arena", "web_gateway", gross)
}

#[actix_web::test]
async fn test_request_approve_receive() {
    let app = init_app!(test_state(RateTable::default(), &[]));

    // 100,000 online sale: net 93,575
    let resp = test::call_service(&app, post("/v1/transactions", ADMIN_KEY, sale(100_000)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let balance: Value =
        test::call_and_read_body_json(&app, get("/v1/payouts/balance", ORGANIZER_KEY).to_request()).await;
    assert_eq!(balance["available"], 93_575);

    let resp = test::call_service(
        &app,
        post("/v1/payouts", ORGANIZER_KEY, TestDataFactory::payout_payload(50_000)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let payout: Value = test::read_body_json(resp).await;
    assert_eq!(payout["status"], "pending");
    assert_eq!(payout["technical_fees"], 750);
    assert_eq!(payout["net_amount"], 49_250);
    let id = payout["id"].as_str().unwrap().to_string();

    let balance: Value =
        test::call_and_read_body_json(&app, get("/v1/payouts/balance", ORGANIZER_KEY).to_request()).await;
    assert_eq!(balance["available"], 43_575);

    let approved: Value = test::call_and_read_body_json(
        &app,
        post(&format!("/v1/payouts/{}/approve", id), ADMIN_KEY, json!({})).to_request(),
    )
    .await;
    assert_eq!(approved["status"], "approved");

    let completed: Value = test::call_and_read_body_json(
        &app,
        post(&format!("/v1/payouts/{}/received", id), ORGANIZER_KEY, json!({})).to_request(),
    )
    .await;
    assert_eq!(completed["status"], "completed");

    // completed is absorbing
    let resp = test::call_service(
        &app,
        post(&format!("/v1/payouts/{}/approve", id), ADMIN_KEY, json!({})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
}

#[actix_web::test]
async fn test_insufficient_balance_creates_nothing() {
    let app = init_app!(test_state(RateTable::default(), &[]));
    test::call_service(&app, post("/v1/transactions", ADMIN_KEY, sale(5_000)).to_request()).await;

    let resp = test::call_service(
        &app,
        post("/v1/payouts", ORGANIZER_KEY, TestDataFactory::payout_payload(6_000)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INSUFFICIENT_BALANCE");

    let payouts: Value =
        test::call_and_read_body_json(&app, get("/v1/payouts", ORGANIZER_KEY).to_request()).await;
    assert_eq!(payouts.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_reject_requires_reason_and_releases_balance() {
    let app = init_app!(test_state(RateTable::default(), &[]));
    test::call_service(&app, post("/v1/transactions", ADMIN_KEY, sale(100_000)).to_request()).await;

    let payout: Value = test::call_and_read_body_json(
        &app,
        post("/v1/payouts", ORGANIZER_KEY, TestDataFactory::payout_payload(90_000)).to_request(),
    )
    .await;
    let id = payout["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        post(&format!("/v1/payouts/{}/reject", id), ADMIN_KEY, TestDataFactory::reject_payload("  ")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "MISSING_REASON");

    let still_pending: Value =
        test::call_and_read_body_json(&app, get(&format!("/v1/payouts/{}", id), ADMIN_KEY).to_request()).await;
    assert_eq!(still_pending["status"], "pending");

    let rejected: Value = test::call_and_read_body_json(
        &app,
        post(
            &format!("/v1/payouts/{}/reject", id),
            ADMIN_KEY,
            TestDataFactory::reject_payload("Numéro Wave invalide"),
        )
        .to_request(),
    )
    .await;
    assert_eq!(rejected["status"], "rejected");
    assert_eq!(rejected["rejection_reason"], "Numéro Wave invalide");

    let balance: Value =
        test::call_and_read_body_json(&app, get("/v1/payouts/balance", ORGANIZER_KEY).to_request()).await;
    assert_eq!(balance["available"], 93_575);
}

#[actix_web::test]
async fn test_silos_are_enforced() {
    let app = init_app!(test_state(RateTable::default(), &[]));
    test::call_service(&app, post("/v1/transactions", ADMIN_KEY, sale(100_000)).to_request()).await;

    let payout: Value = test::call_and_read_body_json(
        &app,
        post("/v1/payouts", ORGANIZER_KEY, TestDataFactory::payout_payload(10_000)).to_request(),
    )
    .await;
    let id = payout["id"].as_str().unwrap().to_string();

    // another organizer can neither read nor confirm it
    let resp = test::call_service(&app, get(&format!("/v1/payouts/{}", id), OTHER_ORGANIZER_KEY).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // organizers cannot approve
    let resp = test::call_service(
        &app,
        post(&format!("/v1/payouts/{}/approve", id), ORGANIZER_KEY, json!({})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // admins have no balance of their own
    let resp = test::call_service(&app, get("/v1/payouts/balance", ADMIN_KEY).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // the other organizer's balance is untouched by this one's sales
    let balance: Value =
        test::call_and_read_body_json(&app, get("/v1/payouts/balance", OTHER_ORGANIZER_KEY).to_request()).await;
    assert_eq!(balance["available"], 0);
}

#[actix_web::test]
async fn test_missing_or_unknown_api_key() {
    let app = init_app!(test_state(RateTable::default(), &[]));

    for req in [
        test::TestRequest::get().uri("/v1/payouts/balance").to_request(),
        get("/v1/payouts/balance", "nope").to_request(),
    ] {
        let status = match test::try_call_service(&app, req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.as_response_error().status_code(),
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_fast_track_releases_held_net() {
    let rates = RateTable {
        escrow_hold_days: 14,
        ..RateTable::default()
    };

    let app = init_app!(test_state(rates.clone(), &[]));
    test::call_service(&app, post("/v1/transactions", ADMIN_KEY, sale(100_000)).to_request()).await;
    let balance: Value =
        test::call_and_read_body_json(&app, get("/v1/payouts/balance", ORGANIZER_KEY).to_request()).await;
    assert_eq!(balance["available"], 0);
    assert_eq!(balance["held_net"], 93_575);

    let app = init_app!(test_state(rates, &[ORGANIZER_ID]));
    test::call_service(&app, post("/v1/transactions", ADMIN_KEY, sale(100_000)).to_request()).await;
    let balance: Value =
        test::call_and_read_body_json(&app, get("/v1/payouts/balance", ORGANIZER_KEY).to_request()).await;
    // 93,575 × 0.70 = 65,502.5
    assert_eq!(balance["available"], 65_503);
}
