use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::AppError;
use crate::core::Amount;
use crate::middleware::auth::Principal;
use crate::modules::payouts::models::{
    PaymentDestination, PaymentMethod, PayoutRecord, PayoutStatus,
};
use crate::modules::payouts::services::PayoutService;
use crate::modules::reports::controllers::report_controller::csv_attachment;
use crate::modules::reports::services::ReportService;

/// Body of `POST /payouts`
#[derive(Debug, Deserialize, Serialize)]
pub struct CreatePayoutRequest {
    pub amount: Amount,
    pub payment_method: PaymentMethod,
    pub payment_details: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RejectPayoutRequest {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ListPayoutsQuery {
    #[serde(default)]
    pub status: Option<String>,
}

fn parse_status(raw: Option<&str>) -> Result<Option<PayoutStatus>, AppError> {
    raw.map(str::parse::<PayoutStatus>)
        .transpose()
        .map_err(AppError::validation)
}

/// Open a payout request against the caller's own balance
/// POST /payouts
pub async fn create_payout(
    service: web::Data<Arc<PayoutService>>,
    principal: Principal,
    request: web::Json<CreatePayoutRequest>,
) -> Result<HttpResponse, AppError> {
    let organizer_id = principal.require_organizer()?;
    let request = request.into_inner();
    let destination = PaymentDestination::new(request.payment_method, request.payment_details)?;

    let payout = service
        .request_payout(organizer_id, request.amount, destination, Utc::now())
        .await?;

    Ok(HttpResponse::Created().json(payout))
}

/// Ingest a request document exported from the legacy store
/// POST /payouts/import
pub async fn import_payout(
    service: web::Data<Arc<PayoutService>>,
    principal: Principal,
    document: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    principal.require_admin()?;
    let payout = service
        .import(PayoutRecord::from_json(document.into_inner())?)
        .await?;

    Ok(HttpResponse::Created().json(payout))
}

/// GET /payouts/balance
pub async fn get_balance(
    service: web::Data<Arc<PayoutService>>,
    principal: Principal,
) -> Result<HttpResponse, AppError> {
    let organizer_id = principal.require_organizer()?;
    let balance = service.balance(organizer_id, Utc::now()).await?;

    Ok(HttpResponse::Ok().json(balance))
}

/// Admins list every request (optionally by status), organizers their own
/// GET /payouts
pub async fn list_payouts(
    service: web::Data<Arc<PayoutService>>,
    principal: Principal,
    query: web::Query<ListPayoutsQuery>,
) -> Result<HttpResponse, AppError> {
    let status = parse_status(query.status.as_deref())?;

    let payouts = match &principal {
        Principal::Admin => service.list(status).await?,
        Principal::Organizer(id) => service
            .list_for_organizer(id)
            .await?
            .into_iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .collect(),
    };

    Ok(HttpResponse::Ok().json(payouts))
}

/// Requests as a CSV attachment, optionally by status
/// GET /payouts/export
pub async fn export_payouts(
    service: web::Data<Arc<PayoutService>>,
    reports: web::Data<Arc<ReportService>>,
    principal: Principal,
    query: web::Query<ListPayoutsQuery>,
) -> Result<HttpResponse, AppError> {
    principal.require_admin()?;
    let status = parse_status(query.status.as_deref())?;
    let payouts = service.list(status).await?;
    let export = reports.export_payouts(&payouts, Utc::now().date_naive())?;

    Ok(csv_attachment(export))
}

/// GET /payouts/{id}
pub async fn get_payout(
    service: web::Data<Arc<PayoutService>>,
    principal: Principal,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let payout = service.get(&path.into_inner()).await?;
    principal.require_access_to(&payout.organizer_id)?;

    Ok(HttpResponse::Ok().json(payout))
}

/// POST /payouts/{id}/approve
pub async fn approve_payout(
    service: web::Data<Arc<PayoutService>>,
    principal: Principal,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    principal.require_admin()?;
    let payout = service.approve(&path.into_inner(), Utc::now()).await?;

    Ok(HttpResponse::Ok().json(payout))
}

/// POST /payouts/{id}/reject
pub async fn reject_payout(
    service: web::Data<Arc<PayoutService>>,
    principal: Principal,
    path: web::Path<String>,
    request: web::Json<RejectPayoutRequest>,
) -> Result<HttpResponse, AppError> {
    principal.require_admin()?;
    let payout = service
        .reject(&path.into_inner(), &request.reason, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(payout))
}

/// Confirm the funds arrived; admin or the owning organizer
/// POST /payouts/{id}/received
pub async fn mark_received(
    service: web::Data<Arc<PayoutService>>,
    principal: Principal,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let current = service.get(&id).await?;
    principal.require_access_to(&current.organizer_id)?;

    let payout = service.mark_received(&id, Utc::now()).await?;

    Ok(HttpResponse::Ok().json(payout))
}

/// Configure payout routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payouts")
            .route("", web::post().to(create_payout))
            .route("", web::get().to(list_payouts))
            .route("/import", web::post().to(import_payout))
            .route("/balance", web::get().to(get_balance))
            .route("/export", web::get().to(export_payouts))
            .route("/{id}", web::get().to(get_payout))
            .route("/{id}/approve", web::post().to(approve_payout))
            .route("/{id}/reject", web::post().to(reject_payout))
            .route("/{id}/received", web::post().to(mark_received)),
    );
}
