use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::Result;
use crate::modules::reports::services::ReportService;

/// Query parameters for the receivables report
#[derive(Debug, Deserialize)]
pub struct ReceivablesQuery {
    /// Inclusive lower bound on document date (YYYY-MM-DD)
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on document date (YYYY-MM-DD)
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

/// GET /reports/receivables
pub async fn receivables(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<ReceivablesQuery>,
) -> Result<HttpResponse> {
    let summary = service.receivables(query.from, query.to).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/reports").route("/receivables", web::get().to(receivables)));
}
