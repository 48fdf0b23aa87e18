pub mod payout_policy;
pub mod payout_service;

pub use payout_policy::{BalanceSnapshot, PayoutPolicy};
pub use payout_service::PayoutService;
