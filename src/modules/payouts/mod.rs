pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{PaymentDestination, PaymentMethod, PayoutRequest, PayoutStatus};
pub use services::{PayoutPolicy, PayoutService};
