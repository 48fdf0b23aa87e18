use serde::{Deserialize, Serialize};

use crate::core::Amount;
use crate::modules::transactions::models::Channel;

/// Three-way split of a gross amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitBreakdown {
    pub channel: Channel,
    pub gross_amount: Amount,
    /// Platform commission
    pub commission: Amount,
    /// Gross minus commission, the base of the gateway fee
    pub net_of_commission: Amount,
    /// Zero on offline channels
    pub gateway_fee: Amount,
    /// Owed to the organizer, partner or driver
    pub net_payout: Amount,
}

impl SplitBreakdown {
    /// Sum of the parts; equals `gross_amount` for every breakdown the
    /// calculator produces
    pub fn total(&self) -> Amount {
        self.commission + self.gateway_fee + self.net_payout
    }
}
