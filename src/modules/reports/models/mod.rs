pub mod financial_report;

pub use financial_report::{
    CategoryTotal, FinancialSummary, PartnerFeeBasis, PartnerReport, ReportPeriod,
};
