pub mod health;
pub mod payouts;
pub mod rates;
pub mod reports;
pub mod splits;
pub mod transactions;

use actix_web::web;

/// Register every versioned API route under `/v1`, plus `/health`
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure(cfg);
    cfg.service(
        web::scope("/v1")
            .configure(splits::controllers::configure)
            .configure(transactions::controllers::configure)
            .configure(payouts::controllers::configure)
            .configure(reports::controllers::configure),
    );
}
