use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::{AppError, Amount, Result};
use crate::modules::payouts::models::{
    PaymentDestination, PayoutRecord, PayoutRequest, PayoutStatus,
};
use crate::modules::payouts::repositories::PayoutRepository;
use crate::modules::payouts::services::payout_policy::{BalanceSnapshot, PayoutPolicy};
use crate::modules::transactions::repositories::TransactionRepository;

/// Loads balances and payout requests, runs them through [`PayoutPolicy`]
/// and persists the outcome
pub struct PayoutService {
    payouts: Arc<dyn PayoutRepository>,
    transactions: Arc<dyn TransactionRepository>,
    policy: PayoutPolicy,
    /// Organizers granted the VIP fast track by an admin
    fast_track: HashSet<String>,
}

impl PayoutService {
    pub fn new(
        payouts: Arc<dyn PayoutRepository>,
        transactions: Arc<dyn TransactionRepository>,
        policy: PayoutPolicy,
    ) -> Self {
        Self {
            payouts,
            transactions,
            policy,
            fast_track: HashSet::new(),
        }
    }

    pub fn with_fast_track<I, S>(mut self, organizer_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fast_track = organizer_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Balance of `organizer_id` as of `now`
    pub async fn balance(&self, organizer_id: &str, now: DateTime<Utc>) -> Result<BalanceSnapshot> {
        let transactions = self.transactions.list_by_partner(organizer_id).await?;
        let payouts = self.payouts.list_by_organizer(organizer_id).await?;

        self.policy.available_balance(
            organizer_id,
            &transactions,
            &payouts,
            now.date_naive(),
            self.fast_track.contains(organizer_id),
        )
    }

    /// Open a payout request against the organizer's current balance
    pub async fn request_payout(
        &self,
        organizer_id: &str,
        requested_amount: Amount,
        destination: PaymentDestination,
        now: DateTime<Utc>,
    ) -> Result<PayoutRequest> {
        let balance = self.balance(organizer_id, now).await?;

        let request = self
            .policy
            .request_payout(organizer_id, balance.available, requested_amount, destination, now)
            .map_err(|e| {
                warn!(
                    organizer_id,
                    requested_amount,
                    available = balance.available,
                    error = %e,
                    "Payout request refused"
                );
                e
            })?;

        let request = self.payouts.insert(request).await?;

        info!(
            payout_id = %request.id,
            organizer_id,
            amount_requested = request.amount_requested,
            technical_fees = request.technical_fees,
            net_amount = request.net_amount,
            "Payout request created"
        );

        Ok(request)
    }

    /// Ingest a request document exported from the legacy store
    pub async fn import(&self, record: PayoutRecord) -> Result<PayoutRequest> {
        let request = self.payouts.insert(PayoutRequest::try_from(record)?).await?;

        info!(
            payout_id = %request.id,
            organizer_id = %request.organizer_id,
            status = %request.status,
            "Payout request imported"
        );

        Ok(request)
    }

    pub async fn get(&self, id: &str) -> Result<PayoutRequest> {
        self.payouts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payout request '{}'", id)))
    }

    pub async fn list(&self, status: Option<PayoutStatus>) -> Result<Vec<PayoutRequest>> {
        self.payouts.list(status).await
    }

    pub async fn list_for_organizer(&self, organizer_id: &str) -> Result<Vec<PayoutRequest>> {
        self.payouts.list_by_organizer(organizer_id).await
    }

    pub async fn approve(&self, id: &str, now: DateTime<Utc>) -> Result<PayoutRequest> {
        let current = self.get(id).await?;
        let next = self.policy.approve(&current, now)?;
        self.commit(current.status, next).await
    }

    pub async fn reject(&self, id: &str, reason: &str, now: DateTime<Utc>) -> Result<PayoutRequest> {
        let current = self.get(id).await?;
        let next = self.policy.reject(&current, reason, now)?;
        self.commit(current.status, next).await
    }

    pub async fn mark_received(&self, id: &str, now: DateTime<Utc>) -> Result<PayoutRequest> {
        let current = self.get(id).await?;
        let next = self.policy.mark_received(&current, now)?;
        self.commit(current.status, next).await
    }

    async fn commit(&self, from: PayoutStatus, next: PayoutRequest) -> Result<PayoutRequest> {
        let stored = self.payouts.compare_and_swap(from, next).await.map_err(|e| {
            warn!(error = %e, "Payout transition lost a concurrent update");
            e
        })?;

        info!(
            payout_id = %stored.id,
            organizer_id = %stored.organizer_id,
            from = %from,
            to = %stored.status,
            "Payout request transitioned"
        );

        Ok(stored)
    }
}
