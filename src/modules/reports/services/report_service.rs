use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::Result;
use crate::modules::payouts::models::PayoutRequest;
use crate::modules::rates::RateTable;
use crate::modules::reports::models::{
    FinancialSummary, PartnerFeeBasis, PartnerReport, ReportPeriod,
};
use crate::modules::reports::services::aggregation_reporter::AggregationReporter;
use crate::modules::reports::services::csv_export::{export_csv, CsvExport};
use crate::modules::transactions::repositories::TransactionRepository;

/// Fetches transactions for a period and folds them into reports
pub struct ReportService {
    transactions: Arc<dyn TransactionRepository>,
    rates: RateTable,
    export_prefix: String,
}

impl ReportService {
    pub fn new(
        transactions: Arc<dyn TransactionRepository>,
        rates: RateTable,
        export_prefix: impl Into<String>,
    ) -> Self {
        Self {
            transactions,
            rates,
            export_prefix: export_prefix.into(),
        }
    }

    pub async fn financial_summary(&self, period: ReportPeriod) -> Result<FinancialSummary> {
        let transactions = self.transactions.list(&period).await?;
        let summary = AggregationReporter::new(&self.rates).summarize(&transactions, period)?;

        if summary.is_empty() {
            warn!(
                start = ?period.start_date,
                end = ?period.end_date,
                "Empty financial summary"
            );
        } else {
            info!(
                start = ?period.start_date,
                end = ?period.end_date,
                total_revenue = summary.total_revenue,
                transactions = summary.totals.transaction_count,
                "Financial summary generated"
            );
        }

        Ok(summary)
    }

    pub async fn partner_reports(
        &self,
        period: ReportPeriod,
        basis: PartnerFeeBasis,
    ) -> Result<Vec<PartnerReport>> {
        let transactions = self.transactions.list(&period).await?;
        let rows = AggregationReporter::new(&self.rates).partner_reports(&transactions, period, basis)?;

        info!(
            start = ?period.start_date,
            end = ?period.end_date,
            ?basis,
            partners = rows.len(),
            "Partner report generated"
        );

        Ok(rows)
    }

    /// Partner report as a `<prefix>_<export_date>.csv` attachment
    pub async fn export_partner_reports(
        &self,
        period: ReportPeriod,
        basis: PartnerFeeBasis,
        export_date: NaiveDate,
    ) -> Result<CsvExport> {
        let rows = self.partner_reports(period, basis).await?;
        export_csv(&self.export_prefix, &rows, export_date)
    }

    /// Raw ledger for the period as CSV
    pub async fn export_transactions(
        &self,
        period: ReportPeriod,
        export_date: NaiveDate,
    ) -> Result<CsvExport> {
        let transactions = self.transactions.list(&period).await?;
        export_csv(
            &format!("{}_transactions", self.export_prefix),
            &transactions,
            export_date,
        )
    }

    /// Payout requests as CSV, for reconciliation with the payment providers
    pub fn export_payouts(
        &self,
        payouts: &[PayoutRequest],
        export_date: NaiveDate,
    ) -> Result<CsvExport> {
        export_csv(
            &format!("{}_payouts", self.export_prefix),
            payouts,
            export_date,
        )
    }
}
