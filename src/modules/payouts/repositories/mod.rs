pub mod payout_repository;

pub use payout_repository::{InMemoryPayoutRepository, PayoutRepository};
