use actix_web::web;
use std::sync::Arc;

use crate::config::Config;
use crate::middleware::ApiKeyStore;
use crate::modules::payouts::repositories::InMemoryPayoutRepository;
use crate::modules::payouts::{PayoutPolicy, PayoutService};
use crate::modules::rates::RateTable;
use crate::modules::reports::ReportService;
use crate::modules::transactions::{InMemoryTransactionRepository, TransactionService};

/// Services shared by every worker
#[derive(Clone)]
pub struct AppState {
    pub transactions: Arc<TransactionService>,
    pub payouts: Arc<PayoutService>,
    pub reports: Arc<ReportService>,
    pub api_keys: Arc<ApiKeyStore>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self::in_memory(
            config.get_rates().clone(),
            ApiKeyStore::new(
                &config.security.admin_api_key,
                &config.security.organizer_api_keys,
            ),
            &config.app.export_prefix,
            config.app.fast_track_organizers.iter().cloned(),
        )
    }

    /// Wire the services over process-local stores
    pub fn in_memory<I>(
        rates: RateTable,
        api_keys: ApiKeyStore,
        export_prefix: &str,
        fast_track_organizers: I,
    ) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let transaction_repo = Arc::new(InMemoryTransactionRepository::new());
        let payout_repo = Arc::new(InMemoryPayoutRepository::new());

        Self {
            transactions: Arc::new(TransactionService::new(
                transaction_repo.clone(),
                rates.clone(),
            )),
            payouts: Arc::new(
                PayoutService::new(
                    payout_repo,
                    transaction_repo.clone(),
                    PayoutPolicy::new(rates.clone()),
                )
                .with_fast_track(fast_track_organizers),
            ),
            reports: Arc::new(ReportService::new(transaction_repo, rates, export_prefix)),
            api_keys: Arc::new(api_keys),
        }
    }

    /// Register the services as handler data
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.transactions.clone()))
            .app_data(web::Data::new(self.payouts.clone()))
            .app_data(web::Data::new(self.reports.clone()));
    }
}
