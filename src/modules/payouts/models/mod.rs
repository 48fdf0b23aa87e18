pub mod payout_request;
pub mod record;

pub use payout_request::{PaymentDestination, PaymentMethod, PayoutRequest, PayoutStatus};
pub use record::PayoutRecord;
