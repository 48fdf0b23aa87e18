//! Storage boundary for transaction documents.
//!
//! Documents from the schemaless store carry camelCase or snake_case keys,
//! floating-point amounts, timestamps as epoch millis or strings, and may
//! omit the split fields entirely. They are resolved here, once, into a
//! checked [`Transaction`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::core::money::amount_from_f64;
use crate::core::{AppError, Amount, Result};
use crate::modules::rates::RateTable;
use crate::modules::splits::SplitCalculator;
use crate::modules::transactions::models::transaction::normalize_name;
use crate::modules::transactions::models::{Channel, Transaction};

/// Raw transaction document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "serviceType", alias = "service_type")]
    pub channel: Option<String>,
    #[serde(default, alias = "grossAmount", alias = "amount", alias = "totalAmount")]
    pub gross_amount: Option<f64>,
    #[serde(default)]
    pub commission: Option<f64>,
    #[serde(default, alias = "gatewayFee")]
    pub gateway_fee: Option<f64>,
    #[serde(default, alias = "netAmount")]
    pub net_amount: Option<f64>,
    #[serde(default, alias = "partnerId", alias = "organizerId", alias = "organizer_id")]
    pub partner_id: Option<String>,
    #[serde(default, alias = "partnerName")]
    pub partner_name: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub reverses: Option<String>,
}

impl TransactionRecord {
    /// Parse a JSON document
    pub fn from_json(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Resolve into a typed transaction.
    ///
    /// Missing split fields are recomputed under `rates`; present ones must
    /// reconcile with the gross amount. Sale amounts must be non-negative and
    /// reversal amounts non-positive, otherwise `InvalidAmount`.
    pub fn into_transaction(self, rates: &RateTable) -> Result<Transaction> {
        let id = required("id", self.id)?;
        let partner_id = required("partner_id", self.partner_id)?;
        let channel: Channel = required("channel", self.channel)?
            .parse()
            .map_err(AppError::Validation)?;
        let created_at = parse_timestamp(
            self.created_at
                .ok_or_else(|| AppError::validation(format!("Transaction '{}': missing created_at", id)))?,
        )?;
        let is_reversal = self.reverses.is_some();

        let amount = |field: &str, value: f64| magnitude(&id, field, value, is_reversal);

        let gross = amount(
            "gross_amount",
            self.gross_amount
                .ok_or_else(|| AppError::validation(format!("Transaction '{}': missing gross_amount", id)))?,
        )?;

        let (commission, gateway_fee, net) =
            match (self.commission, self.gateway_fee, self.net_amount) {
                (Some(c), Some(f), Some(n)) => (
                    amount("commission", c)?,
                    amount("gateway_fee", f)?,
                    amount("net_amount", n)?,
                ),
                (Some(c), None, Some(n)) if !channel.is_online() => {
                    (amount("commission", c)?, 0, amount("net_amount", n)?)
                }
                _ => {
                    let split = SplitCalculator::split(gross, channel, rates)?;
                    (split.commission, split.gateway_fee, split.net_payout)
                }
            };

        let sign: Amount = if is_reversal { -1 } else { 1 };
        let transaction = Transaction {
            id,
            channel,
            gross_amount: sign * gross,
            commission: sign * commission,
            gateway_fee: sign * gateway_fee,
            net_amount: sign * net,
            partner_id,
            partner_name: normalize_name(self.partner_name),
            created_at,
            reverses: self.reverses,
        };
        transaction.check_invariants()?;

        Ok(transaction)
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(format!("Missing required field '{}'", field)))
}

/// Unsigned amount of a stored field; reversals store negated values
fn magnitude(id: &str, field: &str, value: f64, is_reversal: bool) -> Result<Amount> {
    let wrong_sign = if is_reversal { value > 0.0 } else { value < 0.0 };
    if wrong_sign {
        return Err(AppError::invalid_amount(format!(
            "Transaction '{}': {} of {} has the wrong sign for a {}",
            id,
            field,
            value,
            if is_reversal { "reversal" } else { "sale" }
        )));
    }
    amount_from_f64(value.abs())
}

/// Epoch milliseconds, RFC 3339, or a bare `YYYY-MM-DD` date (midnight UTC)
pub(crate) fn parse_timestamp(value: Value) -> Result<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| AppError::validation(format!("Invalid timestamp: {}", n))),
        Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
                return Ok(dt.with_timezone(&Utc));
            }
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
                .ok_or_else(|| AppError::validation(format!("Invalid timestamp: '{}'", s)))
        }
        other => Err(AppError::validation(format!("Invalid timestamp: {}", other))),
    }
}
