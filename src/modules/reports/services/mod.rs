pub mod aggregation_reporter;
pub mod csv_export;
pub mod report_service;

pub use aggregation_reporter::AggregationReporter;
pub use csv_export::{export_csv, CsvExport, CsvRecord};
pub use report_service::ReportService;
