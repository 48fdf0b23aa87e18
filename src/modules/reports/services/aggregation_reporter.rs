use std::collections::BTreeMap;

use crate::core::money::apply_rate;
use crate::core::{AppError, Result};
use crate::modules::rates::RateTable;
use crate::modules::reports::models::{
    CategoryTotal, FinancialSummary, PartnerFeeBasis, PartnerReport, ReportPeriod,
};
use crate::modules::transactions::models::{Channel, RevenueCategory, Transaction};

/// Folds transactions into summaries and partner rows.
///
/// Pure and deterministic: ordered maps only, no clock reads. Transactions
/// outside the period are skipped, reversals net out their originals.
pub struct AggregationReporter<'a> {
    rates: &'a RateTable,
}

impl<'a> AggregationReporter<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    /// Fails with `InvalidAmount` when a total overflows
    pub fn summarize(
        &self,
        transactions: &[Transaction],
        period: ReportPeriod,
    ) -> Result<FinancialSummary> {
        let mut categories: BTreeMap<RevenueCategory, CategoryTotal> = Channel::ALL
            .iter()
            .map(|c| (c.category(), CategoryTotal::default()))
            .collect();

        for tx in in_period(transactions, &period) {
            categories.entry(tx.channel.category()).or_default().add(tx)?;
        }

        let mut ticketing = CategoryTotal::default();
        let mut transport = CategoryTotal::default();
        for (category, total) in &categories {
            if category.is_transport() {
                transport.merge(total)?;
            } else {
                ticketing.merge(total)?;
            }
        }

        let mut totals = ticketing;
        totals.merge(&transport)?;

        Ok(FinancialSummary {
            period,
            categories,
            ticketing,
            transport,
            totals,
            total_revenue: totals.gross_amount,
        })
    }

    /// One row per partner name, ordered by name
    pub fn partner_reports(
        &self,
        transactions: &[Transaction],
        period: ReportPeriod,
        basis: PartnerFeeBasis,
    ) -> Result<Vec<PartnerReport>> {
        let mut by_partner: BTreeMap<String, CategoryTotal> = BTreeMap::new();
        for tx in in_period(transactions, &period) {
            by_partner.entry(tx.report_partner_name()).or_default().add(tx)?;
        }

        by_partner
            .into_iter()
            .map(|(partner_name, total)| self.partner_row(partner_name, total, basis))
            .collect()
    }

    fn partner_row(
        &self,
        partner_name: String,
        total: CategoryTotal,
        basis: PartnerFeeBasis,
    ) -> Result<PartnerReport> {
        let (commission, gateway_fee) = match basis {
            PartnerFeeBasis::Recorded => (total.commission, total.gateway_fee),
            PartnerFeeBasis::FlatOnGross => (
                apply_rate(total.gross_amount, self.rates.platform_commission_rate)?,
                apply_rate(total.gross_amount, self.rates.gateway_fee_rate)?,
            ),
        };

        Ok(PartnerReport {
            partner_name: partner_name.clone(),
            gross_amount: total.gross_amount,
            commission,
            gateway_fee,
            net_amount: total
                .gross_amount
                .checked_sub(commission)
                .and_then(|n| n.checked_sub(gateway_fee))
                .ok_or_else(|| {
                    AppError::invalid_amount(format!("net amount of '{}' overflows", partner_name))
                })?,
            transaction_count: total.transaction_count,
        })
    }
}

fn in_period<'t>(
    transactions: &'t [Transaction],
    period: &'t ReportPeriod,
) -> impl Iterator<Item = &'t Transaction> + 't {
    transactions
        .iter()
        .filter(move |tx| period.contains(tx.created_on()))
}
