pub mod channel;
pub mod record;
pub mod transaction;

pub use channel::{Channel, RevenueCategory, TransportService};
pub use record::TransactionRecord;
pub use transaction::{NewSale, Transaction};
