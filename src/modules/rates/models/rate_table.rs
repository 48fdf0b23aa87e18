use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;

use crate::core::money::{apply_rate, validate_amount, validate_rate};
use crate::core::{AppError, Amount, Result};

/// Fee constants used by every split, payout and report calculation.
///
/// Immutable per deployment; injected explicitly into each calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// Platform cut of the gross amount
    pub platform_commission_rate: Decimal,
    /// Mobile-money fee, applied to (gross - commission) on online channels
    pub gateway_fee_rate: Decimal,
    /// Share of held net released at once under the VIP fast track
    pub vip_immediate_release_rate: Decimal,
    /// Minimum event capacity for the VIP fast track
    pub vip_min_event_capacity: u32,
    /// Days a sale's net stays in escrow before it becomes payable
    pub escrow_hold_days: u32,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            platform_commission_rate: Decimal::new(5, 2),
            gateway_fee_rate: Decimal::new(15, 3),
            vip_immediate_release_rate: Decimal::new(70, 2),
            vip_min_event_capacity: 2000,
            escrow_hold_days: 0,
        }
    }
}

impl RateTable {
    /// Build and validate a rate table with default thresholds
    pub fn new(
        platform_commission_rate: Decimal,
        gateway_fee_rate: Decimal,
        vip_immediate_release_rate: Decimal,
    ) -> Result<Self> {
        let rates = Self {
            platform_commission_rate,
            gateway_fee_rate,
            vip_immediate_release_rate,
            ..Self::default()
        };
        rates.validate()?;
        Ok(rates)
    }

    /// Load rates from `DEMDEM_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load rates through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let decimal = |key: &str, default: Decimal| -> Result<Decimal> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<Decimal>()
                    .map_err(|_| AppError::Configuration(format!("Invalid {}: '{}'", key, raw))),
                None => Ok(default),
            }
        };
        let count = |key: &str, default: u32| -> Result<u32> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| AppError::Configuration(format!("Invalid {}: '{}'", key, raw))),
                None => Ok(default),
            }
        };

        let rates = Self {
            platform_commission_rate: decimal(
                "DEMDEM_COMMISSION_RATE",
                defaults.platform_commission_rate,
            )?,
            gateway_fee_rate: decimal("DEMDEM_GATEWAY_FEE_RATE", defaults.gateway_fee_rate)?,
            vip_immediate_release_rate: decimal(
                "DEMDEM_VIP_RELEASE_RATE",
                defaults.vip_immediate_release_rate,
            )?,
            vip_min_event_capacity: count("DEMDEM_VIP_MIN_CAPACITY", defaults.vip_min_event_capacity)?,
            escrow_hold_days: count("DEMDEM_ESCROW_HOLD_DAYS", defaults.escrow_hold_days)?,
        };
        rates.validate()?;
        Ok(rates)
    }

    /// Every rate in [0, 1], and commission + gateway fee leave a non-negative
    /// net payout share
    pub fn validate(&self) -> Result<()> {
        validate_rate("platform_commission_rate", self.platform_commission_rate)?;
        validate_rate("gateway_fee_rate", self.gateway_fee_rate)?;
        validate_rate("vip_immediate_release_rate", self.vip_immediate_release_rate)?;

        if self.net_payout_rate() < Decimal::ZERO {
            return Err(AppError::invalid_rate(format!(
                "commission ({}) and gateway fee ({}) exceed the gross amount",
                self.platform_commission_rate, self.gateway_fee_rate
            )));
        }
        Ok(())
    }

    /// Share of gross an organizer can request (e.g. 0.95)
    pub fn payout_request_rate(&self) -> Decimal {
        Decimal::ONE - self.platform_commission_rate
    }

    /// Share of gross actually paid out after gateway fees (e.g. 0.935)
    pub fn net_payout_rate(&self) -> Decimal {
        self.payout_request_rate() - self.gateway_fee_rate
    }

    /// Whether an event qualifies for the VIP fast track.
    ///
    /// Callers decide when to apply it; the engine never triggers it on its own.
    pub fn is_vip_eligible(&self, event_capacity: u32, exclusive_agreement: bool) -> bool {
        exclusive_agreement && event_capacity >= self.vip_min_event_capacity
    }

    /// Part of `net` released immediately under the VIP fast track
    pub fn vip_release_amount(&self, net: Amount) -> Result<Amount> {
        validate_amount(net)?;
        apply_rate(net, self.vip_immediate_release_rate)
    }
}
