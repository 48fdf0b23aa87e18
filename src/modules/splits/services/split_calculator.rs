use rust_decimal::Decimal;
use tracing::debug;

use crate::core::money::{apply_rate, validate_amount, validate_rate};
use crate::core::{Amount, Result};
use crate::modules::rates::RateTable;
use crate::modules::splits::models::SplitBreakdown;
use crate::modules::transactions::models::Channel;

/// Commission / gateway fee / net payout arithmetic.
///
/// Every amount is rounded half-up to a whole unit, and the net payout is
/// always derived by subtraction so the three parts add back to the gross
/// exactly. Any rounding remainder therefore lands on the organizer's side,
/// never in the commission.
pub struct SplitCalculator;

impl SplitCalculator {
    /// `round(gross × rate)`
    pub fn compute_commission(gross: Amount, rate: Decimal) -> Result<Amount> {
        validate_amount(gross)?;
        validate_rate("platform_commission_rate", rate)?;
        apply_rate(gross, rate)
    }

    pub fn compute_net_of_commission(gross: Amount, commission: Amount) -> Result<Amount> {
        validate_amount(gross)?;
        validate_amount(commission)?;
        Self::remainder(gross, commission)
    }

    /// `round(net_of_commission × rate)` on online channels, zero otherwise
    pub fn compute_gateway_fee(
        net_of_commission: Amount,
        rate: Decimal,
        channel_is_online: bool,
    ) -> Result<Amount> {
        validate_amount(net_of_commission)?;
        validate_rate("gateway_fee_rate", rate)?;
        if !channel_is_online {
            return Ok(0);
        }
        apply_rate(net_of_commission, rate)
    }

    pub fn compute_net_payout(net_of_commission: Amount, gateway_fee: Amount) -> Result<Amount> {
        validate_amount(net_of_commission)?;
        validate_amount(gateway_fee)?;
        Self::remainder(net_of_commission, gateway_fee)
    }

    /// Full split of `gross` for `channel` under `rates`
    pub fn split(gross: Amount, channel: Channel, rates: &RateTable) -> Result<SplitBreakdown> {
        rates.validate()?;

        let commission = Self::compute_commission(gross, rates.platform_commission_rate)?;
        let net_of_commission = Self::compute_net_of_commission(gross, commission)?;
        let gateway_fee = Self::compute_gateway_fee(
            net_of_commission,
            rates.gateway_fee_rate,
            channel.is_online(),
        )?;
        let net_payout = Self::compute_net_payout(net_of_commission, gateway_fee)?;

        debug!(
            gross,
            %channel,
            commission,
            gateway_fee,
            net_payout,
            "Computed revenue split"
        );

        Ok(SplitBreakdown {
            channel,
            gross_amount: gross,
            commission,
            net_of_commission,
            gateway_fee,
            net_payout,
        })
    }

    fn remainder(whole: Amount, part: Amount) -> Result<Amount> {
        if part > whole {
            return Err(crate::core::AppError::invalid_amount(format!(
                "deduction {} exceeds amount {}",
                part, whole
            )));
        }
        Ok(whole - part)
    }
}
