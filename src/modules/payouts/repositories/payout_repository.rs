use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::core::{AppError, Result};
use crate::modules::payouts::models::{PayoutRequest, PayoutStatus};

/// Persistence capability for payout requests
#[async_trait]
pub trait PayoutRepository: Send + Sync {
    /// Store a new request; `Conflict` on a duplicate id
    async fn insert(&self, request: PayoutRequest) -> Result<PayoutRequest>;

    async fn find_by_id(&self, id: &str) -> Result<Option<PayoutRequest>>;

    /// Requests of one organizer, oldest first
    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<PayoutRequest>>;

    /// All requests, optionally by status, oldest first
    async fn list(&self, status: Option<PayoutStatus>) -> Result<Vec<PayoutRequest>>;

    /// Replace the stored request only if its status is still `expected`.
    ///
    /// This is the only write path for transitions; a writer holding a stale
    /// copy gets `Conflict` instead of overwriting a newer state.
    async fn compare_and_swap(
        &self,
        expected: PayoutStatus,
        next: PayoutRequest,
    ) -> Result<PayoutRequest>;
}

/// Process-local store used by the server binary and tests
#[derive(Debug, Default)]
pub struct InMemoryPayoutRepository {
    rows: RwLock<HashMap<String, PayoutRequest>>,
}

impl InMemoryPayoutRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn oldest_first(mut rows: Vec<PayoutRequest>) -> Vec<PayoutRequest> {
    rows.sort_by(|a, b| {
        a.requested_at
            .cmp(&b.requested_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    rows
}

#[async_trait]
impl PayoutRepository for InMemoryPayoutRepository {
    async fn insert(&self, request: PayoutRequest) -> Result<PayoutRequest> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&request.id) {
            return Err(AppError::conflict(format!(
                "Payout request '{}' already exists",
                request.id
            )));
        }
        rows.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PayoutRequest>> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<PayoutRequest>> {
        let rows = self.rows.read().await;
        Ok(oldest_first(
            rows.values()
                .filter(|p| p.organizer_id == organizer_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list(&self, status: Option<PayoutStatus>) -> Result<Vec<PayoutRequest>> {
        let rows = self.rows.read().await;
        Ok(oldest_first(
            rows.values()
                .filter(|p| status.map_or(true, |s| p.status == s))
                .cloned()
                .collect(),
        ))
    }

    async fn compare_and_swap(
        &self,
        expected: PayoutStatus,
        next: PayoutRequest,
    ) -> Result<PayoutRequest> {
        let mut rows = self.rows.write().await;
        let current = rows
            .get_mut(&next.id)
            .ok_or_else(|| AppError::not_found(format!("Payout request '{}'", next.id)))?;

        if current.status != expected {
            return Err(AppError::conflict(format!(
                "Payout request '{}' is now {}, expected {}",
                next.id, current.status, expected
            )));
        }

        *current = next.clone();
        Ok(next)
    }
}
