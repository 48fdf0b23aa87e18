use std::sync::Arc;

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::core::Result;
use crate::middleware::auth::Principal;
use crate::modules::reports::models::{PartnerFeeBasis, ReportPeriod};
use crate::modules::reports::services::{CsvExport, ReportService};

/// Optional reporting window (inclusive, format: YYYY-MM-DD)
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl PeriodQuery {
    pub fn to_period(&self) -> Result<ReportPeriod> {
        ReportPeriod::new(
            parse_date("start_date", self.start_date.as_deref())?,
            parse_date("end_date", self.end_date.as_deref())?,
        )
    }
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::validation(format!(
                    "Invalid {} format: '{}'. Expected YYYY-MM-DD",
                    field, v
                ))
            }),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PartnerReportQuery {
    #[serde(flatten)]
    pub period: PeriodQuery,
    #[serde(default)]
    pub basis: PartnerFeeBasis,
}

/// Wrap a CSV export as a download
pub fn csv_attachment(export: CsvExport) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(CsvExport::CONTENT_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export.filename)],
        })
        .body(export.content)
}

/// Revenue by category with ticketing and transport sub-totals
/// GET /reports/summary
pub async fn get_summary(
    service: web::Data<Arc<ReportService>>,
    principal: Principal,
    query: web::Query<PeriodQuery>,
) -> std::result::Result<HttpResponse, AppError> {
    principal.require_admin()?;
    let summary = service.financial_summary(query.to_period()?).await?;

    Ok(HttpResponse::Ok().json(summary))
}

/// GET /reports/partners
pub async fn get_partner_reports(
    service: web::Data<Arc<ReportService>>,
    principal: Principal,
    query: web::Query<PartnerReportQuery>,
) -> std::result::Result<HttpResponse, AppError> {
    principal.require_admin()?;
    let rows = service
        .partner_reports(query.period.to_period()?, query.basis)
        .await?;

    Ok(HttpResponse::Ok().json(rows))
}

/// GET /reports/partners/export
pub async fn export_partner_reports(
    service: web::Data<Arc<ReportService>>,
    principal: Principal,
    query: web::Query<PartnerReportQuery>,
) -> std::result::Result<HttpResponse, AppError> {
    principal.require_admin()?;
    let export = service
        .export_partner_reports(
            query.period.to_period()?,
            query.basis,
            Utc::now().date_naive(),
        )
        .await?;

    Ok(csv_attachment(export))
}

/// Configure routes for reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/summary", web::get().to(get_summary))
            .route("/partners", web::get().to(get_partner_reports))
            .route("/partners/export", web::get().to(export_partner_reports)),
    );
}
