pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Channel, NewSale, RevenueCategory, Transaction, TransactionRecord};
pub use repositories::{InMemoryTransactionRepository, TransactionRepository};
pub use services::TransactionService;
