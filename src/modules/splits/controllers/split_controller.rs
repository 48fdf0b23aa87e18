use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::core::error::AppError;
use crate::core::Amount;
use crate::middleware::auth::Principal;
use crate::modules::transactions::models::Channel;
use crate::modules::transactions::services::TransactionService;

#[derive(Debug, Deserialize, Serialize)]
pub struct SplitPreviewRequest {
    pub gross_amount: Amount,
    pub channel: Channel,
}

/// Split a prospective sale without recording it
/// POST /splits/preview
pub async fn preview_split(
    service: web::Data<Arc<TransactionService>>,
    _principal: Principal,
    request: web::Json<SplitPreviewRequest>,
) -> Result<HttpResponse, AppError> {
    let split = service.preview(request.gross_amount, request.channel)?;

    Ok(HttpResponse::Ok().json(split))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/splits").route("/preview", web::post().to(preview_split)));
}
