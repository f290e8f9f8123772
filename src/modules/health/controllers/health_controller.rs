use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::modules::invoices::services::InvoiceService;

/// Health check response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

/// Readiness probe response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub repository: bool,
}

/// GET /health - Liveness probe, does not touch the repository
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /ready - Readiness probe, checks the repository answers a listing
pub async fn readiness_check(service: web::Data<Arc<InvoiceService>>) -> impl Responder {
    let repository = match service.list(1, 0).await {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(error = %e, "Repository readiness check failed");
            false
        }
    };

    let response = ReadinessResponse {
        ready: repository,
        repository,
    };

    if response.ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
