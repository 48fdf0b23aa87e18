// Test App Helpers
//
// Builds the full application over in-memory stores, with the same
// middleware and routes as the server binary.

use demdem_payouts::middleware::ApiKeyStore;
use demdem_payouts::rates::RateTable;
use demdem_payouts::AppState;

use super::test_data::*;

pub fn test_state(rates: RateTable, fast_track: &[&str]) -> AppState {
    AppState::in_memory(
        rates,
        ApiKeyStore::new(
            ADMIN_KEY,
            &[
                (ORGANIZER_KEY.to_string(), ORGANIZER_ID.to_string()),
                (OTHER_ORGANIZER_KEY.to_string(), OTHER_ORGANIZER_ID.to_string()),
            ],
        ),
        EXPORT_PREFIX,
        fast_track.iter().map(|s| s.to_string()),
    )
}

/// Initialize the application service for an [`AppState`]
#[macro_export]
macro_rules! init_app {
    ($state:expr) => {{
        let state: demdem_payouts::AppState = $state;
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(demdem_payouts::middleware::ApiKeyAuth::new(
                    state.api_keys.clone(),
                ))
                .wrap(demdem_payouts::middleware::RequestId)
                .configure(|cfg| state.configure(cfg))
                .configure(demdem_payouts::modules::configure),
        )
        .await
    }};
}

/// GET `uri` as the holder of `api_key`
pub fn get(uri: &str, api_key: &str) -> actix_web::test::TestRequest {
    actix_web::test::TestRequest::get()
        .uri(uri)
        .insert_header(("X-API-Key", api_key.to_string()))
}

/// POST `body` to `uri` as the holder of `api_key`
pub fn post(uri: &str, api_key: &str, body: serde_json::Value) -> actix_web::test::TestRequest {
    actix_web::test::TestRequest::post()
        .uri(uri)
        .insert_header(("X-API-Key", api_key.to_string()))
        .set_json(body)
}
