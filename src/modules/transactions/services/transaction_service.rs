use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::core::{AppError, Amount, Result};
use crate::modules::rates::RateTable;
use crate::modules::reports::models::ReportPeriod;
use crate::modules::splits::models::SplitBreakdown;
use crate::modules::splits::SplitCalculator;
use crate::modules::transactions::models::{Channel, NewSale, Transaction, TransactionRecord};
use crate::modules::transactions::repositories::TransactionRepository;

/// Records sales with their split and keeps the ledger append-only
pub struct TransactionService {
    repo: Arc<dyn TransactionRepository>,
    rates: RateTable,
}

impl TransactionService {
    pub fn new(repo: Arc<dyn TransactionRepository>, rates: RateTable) -> Self {
        Self { repo, rates }
    }

    /// Split preview, nothing is stored
    pub fn preview(&self, gross_amount: Amount, channel: Channel) -> Result<SplitBreakdown> {
        SplitCalculator::split(gross_amount, channel, &self.rates)
    }

    pub async fn record_sale(&self, sale: NewSale, now: DateTime<Utc>) -> Result<Transaction> {
        let transaction = Transaction::record_sale(sale, &self.rates, now)?;
        let transaction = self.repo.insert(transaction).await?;

        info!(
            transaction_id = %transaction.id,
            partner_id = %transaction.partner_id,
            channel = %transaction.channel,
            gross = transaction.gross_amount,
            commission = transaction.commission,
            gateway_fee = transaction.gateway_fee,
            net = transaction.net_amount,
            "Sale recorded"
        );

        Ok(transaction)
    }

    /// Ingest a raw document from the external store
    pub async fn import(&self, record: TransactionRecord) -> Result<Transaction> {
        let transaction = record.into_transaction(&self.rates)?;
        let transaction = self.repo.insert(transaction).await?;

        info!(
            transaction_id = %transaction.id,
            partner_id = %transaction.partner_id,
            "Transaction imported"
        );

        Ok(transaction)
    }

    /// Append a reversal cancelling transaction `id`
    pub async fn reverse(&self, id: &str, now: DateTime<Utc>) -> Result<Transaction> {
        let original = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Transaction '{}'", id)))?;

        let reversal = self.repo.insert(original.reversal(now)?).await?;

        info!(
            transaction_id = %reversal.id,
            reverses = %original.id,
            gross = reversal.gross_amount,
            "Transaction reversed"
        );

        Ok(reversal)
    }

    pub async fn get(&self, id: &str) -> Result<Transaction> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Transaction '{}'", id)))
    }

    pub async fn list(&self, period: &ReportPeriod) -> Result<Vec<Transaction>> {
        self.repo.list(period).await
    }
}
