use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::Value;

use crate::core::error::AppError;
use crate::middleware::auth::Principal;
use crate::modules::reports::controllers::report_controller::{csv_attachment, PeriodQuery};
use crate::modules::reports::services::ReportService;
use crate::modules::transactions::models::{NewSale, TransactionRecord};
use crate::modules::transactions::services::TransactionService;

/// Record a sale and its split
/// POST /transactions
pub async fn create_transaction(
    service: web::Data<Arc<TransactionService>>,
    principal: Principal,
    request: web::Json<NewSale>,
) -> Result<HttpResponse, AppError> {
    principal.require_admin()?;
    let transaction = service.record_sale(request.into_inner(), Utc::now()).await?;

    Ok(HttpResponse::Created().json(transaction))
}

/// Ingest a raw document exported from the legacy store
/// POST /transactions/import
pub async fn import_transaction(
    service: web::Data<Arc<TransactionService>>,
    principal: Principal,
    document: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    principal.require_admin()?;
    let record = TransactionRecord::from_json(document.into_inner())?;
    let transaction = service.import(record).await?;

    Ok(HttpResponse::Created().json(transaction))
}

/// GET /transactions?start_date=&end_date=
pub async fn list_transactions(
    service: web::Data<Arc<TransactionService>>,
    principal: Principal,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    principal.require_admin()?;
    let transactions = service.list(&query.to_period()?).await?;

    Ok(HttpResponse::Ok().json(transactions))
}

/// Ledger for the period as a CSV attachment
/// GET /transactions/export
pub async fn export_transactions(
    reports: web::Data<Arc<ReportService>>,
    principal: Principal,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    principal.require_admin()?;
    let export = reports
        .export_transactions(query.to_period()?, Utc::now().date_naive())
        .await?;

    Ok(csv_attachment(export))
}

/// GET /transactions/{id}
pub async fn get_transaction(
    service: web::Data<Arc<TransactionService>>,
    principal: Principal,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    principal.require_admin()?;
    let transaction = service.get(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(transaction))
}

/// Append a reversal; the original stays untouched
/// POST /transactions/{id}/reverse
pub async fn reverse_transaction(
    service: web::Data<Arc<TransactionService>>,
    principal: Principal,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    principal.require_admin()?;
    let reversal = service.reverse(&path.into_inner(), Utc::now()).await?;

    Ok(HttpResponse::Created().json(reversal))
}

/// Configure transaction routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/transactions")
            .route("", web::post().to(create_transaction))
            .route("", web::get().to(list_transactions))
            .route("/import", web::post().to(import_transaction))
            .route("/export", web::get().to(export_transactions))
            .route("/{id}", web::get().to(get_transaction))
            .route("/{id}/reverse", web::post().to(reverse_transaction)),
    );
}
