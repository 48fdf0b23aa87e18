pub mod controllers;
pub mod models;
pub mod services;

pub use models::{FinancialSummary, PartnerFeeBasis, PartnerReport, ReportPeriod};
pub use services::{AggregationReporter, ReportService};
