//! DemDem payouts library
//!
//! Revenue splitting, organizer payouts and partner reporting for the
//! EvenPass ticketing and DemDem Voyage transport platforms.

pub mod app_state;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use app_state::AppState;
pub use modules::payouts;
pub use modules::rates;
pub use modules::reports;
pub use modules::splits;
pub use modules::transactions;
