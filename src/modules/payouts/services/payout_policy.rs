use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::money::checked_sum;
use crate::core::{AppError, Amount, Result};
use crate::modules::payouts::models::{PaymentDestination, PayoutRequest, PayoutStatus};
use crate::modules::rates::RateTable;
use crate::modules::splits::SplitCalculator;
use crate::modules::transactions::models::Transaction;

/// Organizer balance at a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub organizer_id: String,
    pub as_of: NaiveDate,
    /// Net of every sale and reversal
    pub earned_net: Amount,
    /// Net out of escrow (including any fast-track release)
    pub released_net: Amount,
    /// Net still in escrow
    pub held_net: Amount,
    /// Requested by payouts that were not rejected
    pub reserved_by_payouts: Amount,
    /// `released_net - reserved_by_payouts`
    pub available: Amount,
}

/// Single authority over payout request transitions.
///
/// ```text
/// pending ──approve──▶ approved ──mark_received──▶ completed
///    │                    │
///    └──────reject────────┴──────▶ rejected
/// ```
///
/// Every transition takes the current request by reference and returns the
/// next value; on error nothing is produced and the input is untouched.
/// Persisting the result (and guarding it against concurrent writers) is the
/// caller's job.
#[derive(Debug, Clone)]
pub struct PayoutPolicy {
    rates: RateTable,
}

impl PayoutPolicy {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Open a `pending` request against `available_net_balance`
    pub fn request_payout(
        &self,
        organizer_id: &str,
        available_net_balance: Amount,
        requested_amount: Amount,
        destination: PaymentDestination,
        requested_at: DateTime<Utc>,
    ) -> Result<PayoutRequest> {
        let organizer_id = organizer_id.trim();
        if organizer_id.is_empty() {
            return Err(AppError::validation("Organizer ID cannot be empty"));
        }
        if requested_amount <= 0 {
            return Err(AppError::invalid_amount(format!(
                "requested payout must be positive, got {}",
                requested_amount
            )));
        }
        if requested_amount > available_net_balance {
            return Err(AppError::InsufficientBalance {
                requested: requested_amount,
                available: available_net_balance,
            });
        }

        let technical_fees =
            SplitCalculator::compute_gateway_fee(requested_amount, self.rates.gateway_fee_rate, true)?;

        Ok(PayoutRequest {
            id: uuid::Uuid::new_v4().to_string(),
            organizer_id: organizer_id.to_string(),
            amount_requested: requested_amount,
            technical_fees,
            net_amount: requested_amount - technical_fees,
            status: PayoutStatus::Pending,
            payment_method: destination.payment_method,
            payment_details: destination.payment_details,
            requested_at,
            processed_at: None,
            marked_received_at: None,
            rejection_reason: None,
        })
    }

    /// `pending → approved`
    pub fn approve(&self, request: &PayoutRequest, at: DateTime<Utc>) -> Result<PayoutRequest> {
        if request.status != PayoutStatus::Pending {
            return Err(AppError::invalid_transition(request.status, "approve"));
        }

        Ok(PayoutRequest {
            status: PayoutStatus::Approved,
            processed_at: Some(at),
            ..request.clone()
        })
    }

    /// `pending | approved → rejected`, reason required
    pub fn reject(
        &self,
        request: &PayoutRequest,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<PayoutRequest> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::MissingReason);
        }
        if !matches!(request.status, PayoutStatus::Pending | PayoutStatus::Approved) {
            return Err(AppError::invalid_transition(request.status, "reject"));
        }

        Ok(PayoutRequest {
            status: PayoutStatus::Rejected,
            processed_at: Some(at),
            rejection_reason: Some(reason.to_string()),
            ..request.clone()
        })
    }

    /// `approved → completed`, once the organizer confirms receipt
    pub fn mark_received(&self, request: &PayoutRequest, at: DateTime<Utc>) -> Result<PayoutRequest> {
        if request.status != PayoutStatus::Approved {
            return Err(AppError::invalid_transition(request.status, "mark as received"));
        }

        Ok(PayoutRequest {
            status: PayoutStatus::Completed,
            marked_received_at: Some(at),
            ..request.clone()
        })
    }

    /// Payable balance of `organizer_id` on `as_of`.
    ///
    /// A sale's net leaves escrow `escrow_hold_days` after its creation date.
    /// A reversal lands in the same bucket as the sale it cancels, or is
    /// debited from the released net at once when that sale is not among
    /// `transactions`. With `fast_track`, the VIP release share of the held
    /// net is released now; whether an organizer qualifies is the caller's
    /// decision (see [`RateTable::is_vip_eligible`]).
    pub fn available_balance(
        &self,
        organizer_id: &str,
        transactions: &[Transaction],
        payouts: &[PayoutRequest],
        as_of: NaiveDate,
        fast_track: bool,
    ) -> Result<BalanceSnapshot> {
        let own: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| t.partner_id == organizer_id)
            .collect();
        let by_id: HashMap<&str, &Transaction> = own.iter().map(|t| (t.id.as_str(), *t)).collect();

        let mut released: Amount = 0;
        let mut held: Amount = 0;
        for tx in &own {
            let in_escrow = match tx.reverses.as_deref() {
                Some(original_id) => match by_id.get(original_id) {
                    Some(original) => self.release_date(original)? > as_of,
                    None => false,
                },
                None => self.release_date(tx)? > as_of,
            };
            if in_escrow {
                held = checked_sum(held, tx.net_amount)?;
            } else {
                released = checked_sum(released, tx.net_amount)?;
            }
        }

        if fast_track && held > 0 {
            let early = self.rates.vip_release_amount(held)?;
            released = checked_sum(released, early)?;
            held -= early;
        }

        let reserved = payouts
            .iter()
            .filter(|p| p.organizer_id == organizer_id && p.status.reserves_balance())
            .try_fold(0, |sum, p| checked_sum(sum, p.amount_requested))?;
        let available = released.checked_sub(reserved).ok_or_else(|| {
            AppError::invalid_amount(format!("{} - {} overflows", released, reserved))
        })?;

        Ok(BalanceSnapshot {
            organizer_id: organizer_id.to_string(),
            as_of,
            earned_net: checked_sum(released, held)?,
            released_net: released,
            held_net: held,
            reserved_by_payouts: reserved,
            available,
        })
    }

    fn release_date(&self, tx: &Transaction) -> Result<NaiveDate> {
        tx.created_on()
            .checked_add_days(Days::new(u64::from(self.rates.escrow_hold_days)))
            .ok_or_else(|| {
                AppError::validation(format!("Transaction '{}': release date out of range", tx.id))
            })
    }
}
