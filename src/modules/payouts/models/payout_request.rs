use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{AppError, Amount, Result};

/// Payout request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    /// Awaiting admin decision
    Pending,
    /// Approved, funds on their way
    Approved,
    /// Refused (terminal)
    Rejected,
    /// Receipt confirmed (terminal)
    Completed,
}

impl PayoutStatus {
    /// `completed` and `rejected` admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, PayoutStatus::Rejected | PayoutStatus::Completed)
    }

    /// Whether the request still holds the organizer's balance
    pub fn reserves_balance(&self) -> bool {
        !matches!(self, PayoutStatus::Rejected)
    }
}

impl Default for PayoutStatus {
    fn default() -> Self {
        PayoutStatus::Pending
    }
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoutStatus::Pending => write!(f, "pending"),
            PayoutStatus::Approved => write!(f, "approved"),
            PayoutStatus::Rejected => write!(f, "rejected"),
            PayoutStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for PayoutStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(PayoutStatus::Pending),
            "approved" => Ok(PayoutStatus::Approved),
            "rejected" => Ok(PayoutStatus::Rejected),
            "completed" => Ok(PayoutStatus::Completed),
            _ => Err(format!("Invalid payout status: {}", s)),
        }
    }
}

/// Where the organizer wants to be paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Wave,
    OrangeMoney,
    FreeMoney,
    BankTransfer,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Wave => write!(f, "wave"),
            PaymentMethod::OrangeMoney => write!(f, "orange_money"),
            PaymentMethod::FreeMoney => write!(f, "free_money"),
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "wave" => Ok(PaymentMethod::Wave),
            "orange_money" | "orange" => Ok(PaymentMethod::OrangeMoney),
            "free_money" | "free" => Ok(PaymentMethod::FreeMoney),
            "bank_transfer" | "bank" => Ok(PaymentMethod::BankTransfer),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

/// Payment method plus phone number or account reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDestination {
    pub payment_method: PaymentMethod,
    pub payment_details: String,
}

impl PaymentDestination {
    pub fn new(payment_method: PaymentMethod, payment_details: impl Into<String>) -> Result<Self> {
        let payment_details = payment_details.into().trim().to_string();
        if payment_details.is_empty() {
            return Err(AppError::validation(
                "Payment details (phone number or account) cannot be empty",
            ));
        }
        Ok(Self {
            payment_method,
            payment_details,
        })
    }
}

/// Organizer's request to withdraw part of its net balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRequest {
    pub id: String,
    pub organizer_id: String,
    /// Portion of the balance being withdrawn
    pub amount_requested: Amount,
    /// Gateway fee charged on the transfer
    pub technical_fees: Amount,
    /// Amount actually paid out
    pub net_amount: Amount,
    pub status: PayoutStatus,
    pub payment_method: PaymentMethod,
    pub payment_details: String,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub marked_received_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

impl PayoutRequest {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn check_invariants(&self) -> Result<()> {
        if self.net_amount != self.amount_requested - self.technical_fees {
            return Err(AppError::validation(format!(
                "Payout '{}': net {} != requested {} - fees {}",
                self.id, self.net_amount, self.amount_requested, self.technical_fees
            )));
        }
        if self.status == PayoutStatus::Rejected && self.rejection_reason.is_none() {
            return Err(AppError::validation(format!(
                "Payout '{}': rejected without a reason",
                self.id
            )));
        }
        Ok(())
    }
}
