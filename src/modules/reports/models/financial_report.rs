use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::money::checked_sum;
use crate::core::{AppError, Amount, Result};
use crate::modules::transactions::models::{RevenueCategory, Transaction};

/// Optional inclusive date window over transaction creation dates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportPeriod {
    pub fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Result<Self> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(AppError::validation(format!(
                    "start_date ({}) must be before or equal to end_date ({})",
                    start, end
                )));
            }
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Unbounded on both sides
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
    }
}

/// Summed split fields of a group of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub gross_amount: Amount,
    pub commission: Amount,
    pub gateway_fee: Amount,
    pub net_amount: Amount,
    pub transaction_count: u64,
}

impl CategoryTotal {
    pub fn add(&mut self, transaction: &Transaction) -> Result<()> {
        self.merge(&CategoryTotal {
            gross_amount: transaction.gross_amount,
            commission: transaction.commission,
            gateway_fee: transaction.gateway_fee,
            net_amount: transaction.net_amount,
            transaction_count: 1,
        })
    }

    /// Fails with `InvalidAmount` when a sum leaves the `i64` range
    pub fn merge(&mut self, other: &CategoryTotal) -> Result<()> {
        *self = CategoryTotal {
            gross_amount: checked_sum(self.gross_amount, other.gross_amount)?,
            commission: checked_sum(self.commission, other.commission)?,
            gateway_fee: checked_sum(self.gateway_fee, other.gateway_fee)?,
            net_amount: checked_sum(self.net_amount, other.net_amount)?,
            transaction_count: self.transaction_count + other.transaction_count,
        };
        Ok(())
    }
}

/// Revenue broken down by ticketing, transport sub-channel and subscriptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub period: ReportPeriod,
    /// Every category is present, zeroed when it saw no sale
    pub categories: BTreeMap<RevenueCategory, CategoryTotal>,
    /// Ticketing categories combined
    pub ticketing: CategoryTotal,
    /// Transport and subscription categories combined
    pub transport: CategoryTotal,
    /// All categories combined
    pub totals: CategoryTotal,
    /// Gross revenue over every category
    pub total_revenue: Amount,
}

impl FinancialSummary {
    pub fn is_empty(&self) -> bool {
        self.totals.transaction_count == 0
    }

    pub fn category(&self, category: RevenueCategory) -> CategoryTotal {
        self.categories.get(&category).copied().unwrap_or_default()
    }
}

/// One row per partner of the partner report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerReport {
    pub partner_name: String,
    pub gross_amount: Amount,
    pub commission: Amount,
    pub gateway_fee: Amount,
    pub net_amount: Amount,
    pub transaction_count: u64,
}

/// How partner commission and gateway fees are derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerFeeBasis {
    /// Sum of the split recorded on each transaction
    #[default]
    Recorded,
    /// Flat rates applied to the partner's aggregated gross, as the admin
    /// dashboard estimates them
    FlatOnGross,
}
