use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Amount, Result};
use crate::modules::rates::RateTable;
use crate::modules::splits::models::SplitBreakdown;
use crate::modules::splits::SplitCalculator;
use crate::modules::transactions::models::Channel;

/// Sale awaiting its split, as submitted by a caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    pub partner_id: String,
    #[serde(default)]
    pub partner_name: Option<String>,
    pub channel: Channel,
    pub gross_amount: Amount,
}

/// One sale event with its revenue split.
///
/// Immutable once created; corrections are recorded as reversal
/// transactions carrying the negated split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub channel: Channel,
    pub gross_amount: Amount,
    pub commission: Amount,
    pub gateway_fee: Amount,
    pub net_amount: Amount,
    pub partner_id: String,
    #[serde(default)]
    pub partner_name: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Id of the transaction this one reverses
    #[serde(default)]
    pub reverses: Option<String>,
}

impl Transaction {
    /// Split a sale under `rates` and stamp it
    pub fn record_sale(sale: NewSale, rates: &RateTable, created_at: DateTime<Utc>) -> Result<Self> {
        if sale.partner_id.trim().is_empty() {
            return Err(AppError::validation("Partner ID cannot be empty"));
        }

        let split = SplitCalculator::split(sale.gross_amount, sale.channel, rates)?;

        Ok(Self::from_split(
            uuid::Uuid::new_v4().to_string(),
            sale.partner_id,
            normalize_name(sale.partner_name),
            &split,
            created_at,
        ))
    }

    pub fn from_split(
        id: String,
        partner_id: String,
        partner_name: Option<String>,
        split: &SplitBreakdown,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            channel: split.channel,
            gross_amount: split.gross_amount,
            commission: split.commission,
            gateway_fee: split.gateway_fee,
            net_amount: split.net_payout,
            partner_id,
            partner_name,
            created_at,
            reverses: None,
        }
    }

    /// Counter-transaction cancelling this one
    pub fn reversal(&self, created_at: DateTime<Utc>) -> Result<Self> {
        if self.is_reversal() {
            return Err(AppError::validation(format!(
                "Transaction '{}' is itself a reversal and cannot be reversed",
                self.id
            )));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            channel: self.channel,
            gross_amount: -self.gross_amount,
            commission: -self.commission,
            gateway_fee: -self.gateway_fee,
            net_amount: -self.net_amount,
            partner_id: self.partner_id.clone(),
            partner_name: self.partner_name.clone(),
            created_at,
            reverses: Some(self.id.clone()),
        })
    }

    pub fn is_reversal(&self) -> bool {
        self.reverses.is_some()
    }

    /// Same partner and channel as `original`, with every amount negated
    pub fn cancels(&self, original: &Transaction) -> bool {
        self.reverses.as_deref() == Some(original.id.as_str())
            && self.partner_id == original.partner_id
            && self.channel == original.channel
            && self.gross_amount == -original.gross_amount
            && self.commission == -original.commission
            && self.gateway_fee == -original.gateway_fee
            && self.net_amount == -original.net_amount
    }

    /// Date component used by report filters
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// `partner_name`, or the upper-cased channel when the sale has none
    pub fn report_partner_name(&self) -> String {
        self.partner_name
            .clone()
            .unwrap_or_else(|| self.channel.as_str().to_uppercase())
    }

    /// Split fields reconcile with the gross and the channel
    pub fn check_invariants(&self) -> Result<()> {
        if self.net_amount != self.gross_amount - self.commission - self.gateway_fee {
            return Err(AppError::validation(format!(
                "Transaction '{}': net {} != gross {} - commission {} - gateway fee {}",
                self.id, self.net_amount, self.gross_amount, self.commission, self.gateway_fee
            )));
        }
        if !self.channel.is_online() && self.gateway_fee != 0 {
            return Err(AppError::validation(format!(
                "Transaction '{}': offline channel carries a gateway fee of {}",
                self.id, self.gateway_fee
            )));
        }
        Ok(())
    }
}

pub(crate) fn normalize_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
