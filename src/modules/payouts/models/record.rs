//! Storage boundary for payout request documents.

use serde::Deserialize;
use serde_json::Value;

use crate::core::money::amount_from_f64;
use crate::core::{AppError, Result};
use crate::modules::payouts::models::{PaymentMethod, PayoutRequest, PayoutStatus};
use crate::modules::transactions::models::record::parse_timestamp;

/// Raw payout request document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayoutRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "organizerId")]
    pub organizer_id: Option<String>,
    #[serde(default, alias = "amountRequested")]
    pub amount_requested: Option<f64>,
    #[serde(default, alias = "technicalFees")]
    pub technical_fees: Option<f64>,
    #[serde(default, alias = "netAmount")]
    pub net_amount: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "paymentMethod")]
    pub payment_method: Option<String>,
    #[serde(default, alias = "paymentDetails")]
    pub payment_details: Option<String>,
    #[serde(default, alias = "requestedAt")]
    pub requested_at: Option<Value>,
    #[serde(default, alias = "processedAt")]
    pub processed_at: Option<Value>,
    #[serde(default, alias = "markedReceivedAt")]
    pub marked_received_at: Option<Value>,
    #[serde(default, alias = "rejectionReason")]
    pub rejection_reason: Option<String>,
}

impl PayoutRecord {
    pub fn from_json(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

impl TryFrom<PayoutRecord> for PayoutRequest {
    type Error = AppError;

    fn try_from(record: PayoutRecord) -> Result<Self> {
        let id = text("id", record.id)?;
        let organizer_id = text("organizer_id", record.organizer_id)?;
        let amount_requested = amount_from_f64(
            record
                .amount_requested
                .ok_or_else(|| AppError::validation(format!("Payout '{}': missing amount_requested", id)))?,
        )?;

        // Either fee or net may be missing; the other is derived
        let (technical_fees, net_amount) = match (record.technical_fees, record.net_amount) {
            (Some(fees), Some(net)) => (amount_from_f64(fees)?, amount_from_f64(net)?),
            (Some(fees), None) => {
                let fees = amount_from_f64(fees)?;
                (fees, amount_requested - fees)
            }
            (None, Some(net)) => {
                let net = amount_from_f64(net)?;
                (amount_requested - net, net)
            }
            (None, None) => {
                return Err(AppError::validation(format!(
                    "Payout '{}': missing technical_fees and net_amount",
                    id
                )))
            }
        };

        let status = match record.status {
            Some(s) => s.parse::<PayoutStatus>().map_err(AppError::Validation)?,
            None => PayoutStatus::Pending,
        };
        let payment_method = text("payment_method", record.payment_method)?
            .parse::<PaymentMethod>()
            .map_err(AppError::Validation)?;

        let request = PayoutRequest {
            id: id.clone(),
            organizer_id,
            amount_requested,
            technical_fees,
            net_amount,
            status,
            payment_method,
            payment_details: text("payment_details", record.payment_details)?,
            requested_at: parse_timestamp(record.requested_at.ok_or_else(|| {
                AppError::validation(format!("Payout '{}': missing requested_at", id))
            })?)?,
            processed_at: record.processed_at.map(parse_timestamp).transpose()?,
            marked_received_at: record.marked_received_at.map(parse_timestamp).transpose()?,
            rejection_reason: record
                .rejection_reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
        };
        request.check_invariants()?;

        Ok(request)
    }
}

fn text(field: &str, value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(format!("Missing required field '{}'", field)))
}
