use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{AppError, Result};
use crate::modules::payouts::models::PayoutRequest;
use crate::modules::reports::models::PartnerReport;
use crate::modules::transactions::models::Transaction;

/// Row type with a fixed header line
pub trait CsvRecord: Serialize {
    const HEADERS: &'static [&'static str];
}

impl CsvRecord for PartnerReport {
    const HEADERS: &'static [&'static str] = &[
        "partner_name",
        "gross_amount",
        "commission",
        "gateway_fee",
        "net_amount",
        "transaction_count",
    ];
}

impl CsvRecord for Transaction {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "channel",
        "gross_amount",
        "commission",
        "gateway_fee",
        "net_amount",
        "partner_id",
        "partner_name",
        "created_at",
        "reverses",
    ];
}

impl CsvRecord for PayoutRequest {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "organizer_id",
        "amount_requested",
        "technical_fees",
        "net_amount",
        "status",
        "payment_method",
        "payment_details",
        "requested_at",
        "processed_at",
        "marked_received_at",
        "rejection_reason",
    ];
}

/// Downloadable CSV file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// `<prefix>_<YYYY-MM-DD>.csv`
    pub filename: String,
    /// UTF-8 bytes, header row first
    pub content: Vec<u8>,
}

impl CsvExport {
    pub const CONTENT_TYPE: &'static str = "text/csv; charset=utf-8";
}

/// Serialize `rows` as comma-separated values.
///
/// The header row is always written, even for an empty export. Fields that
/// contain a comma, quote or line break are quoted.
pub fn export_csv<T: CsvRecord>(
    prefix: &str,
    rows: &[T],
    export_date: NaiveDate,
) -> Result<CsvExport> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(AppError::validation("Export prefix cannot be empty"));
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(T::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    let content = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("Failed to flush CSV export: {}", e)))?;

    Ok(CsvExport {
        filename: format!("{}_{}.csv", prefix, export_date.format("%Y-%m-%d")),
        content,
    })
}
