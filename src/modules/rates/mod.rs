pub mod models;

pub use models::RateTable;
