use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::{AppError, Result};
use crate::modules::reports::models::ReportPeriod;
use crate::modules::transactions::models::Transaction;

/// Persistence capability for sale transactions.
///
/// Transactions are append-only; there is no update or delete.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Append a transaction.
    ///
    /// Fails with `Conflict` on a duplicate id or when the transaction it
    /// reverses has already been reversed, with `NotFound` when the reversed
    /// transaction does not exist, and with `Validation` when that
    /// transaction is itself a reversal or is not exactly cancelled.
    async fn insert(&self, transaction: Transaction) -> Result<Transaction>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Transaction>>;

    /// All transactions whose creation date falls in `period`, oldest first
    async fn list(&self, period: &ReportPeriod) -> Result<Vec<Transaction>>;

    /// All transactions of one partner, oldest first
    async fn list_by_partner(&self, partner_id: &str) -> Result<Vec<Transaction>>;
}

/// Process-local store used by the server binary and tests
#[derive(Debug, Default)]
pub struct InMemoryTransactionRepository {
    rows: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with already-validated transactions
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            rows: RwLock::new(transactions),
        }
    }
}

fn sorted(mut rows: Vec<Transaction>) -> Vec<Transaction> {
    rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    rows
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn insert(&self, transaction: Transaction) -> Result<Transaction> {
        let mut rows = self.rows.write().await;

        if rows.iter().any(|t| t.id == transaction.id) {
            return Err(AppError::conflict(format!(
                "Transaction '{}' already exists",
                transaction.id
            )));
        }

        if let Some(original_id) = transaction.reverses.as_deref() {
            let original = rows
                .iter()
                .find(|t| t.id == original_id)
                .ok_or_else(|| AppError::not_found(format!("Transaction '{}'", original_id)))?;
            if original.is_reversal() {
                return Err(AppError::validation(format!(
                    "Transaction '{}' is itself a reversal and cannot be reversed",
                    original_id
                )));
            }
            if !transaction.cancels(original) {
                return Err(AppError::validation(format!(
                    "Transaction '{}' does not cancel '{}': partner, channel and negated amounts must match",
                    transaction.id, original_id
                )));
            }
            if rows.iter().any(|t| t.reverses.as_deref() == Some(original_id)) {
                return Err(AppError::conflict(format!(
                    "Transaction '{}' has already been reversed",
                    original_id
                )));
            }
        }

        rows.push(transaction.clone());
        Ok(transaction)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Transaction>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self, period: &ReportPeriod) -> Result<Vec<Transaction>> {
        let rows = self.rows.read().await;
        Ok(sorted(
            rows.iter()
                .filter(|t| period.contains(t.created_on()))
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_partner(&self, partner_id: &str) -> Result<Vec<Transaction>> {
        let rows = self.rows.read().await;
        Ok(sorted(
            rows.iter()
                .filter(|t| t.partner_id == partner_id)
                .cloned()
                .collect(),
        ))
    }
}
