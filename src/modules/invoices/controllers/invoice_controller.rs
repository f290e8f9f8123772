use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::invoices::models::{ItemEdit, NewDocument};
use crate::modules::invoices::services::{
    InvoiceService, LedgerOperation, MarkCompleteRequest, RecordPaymentRequest, SetRatesRequest,
    SetStatusRequest,
};

/// Query parameters for listing documents
#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

type Service = web::Data<Arc<InvoiceService>>;

/// POST /documents
pub async fn create_document(
    service: Service,
    request: web::Json<NewDocument>,
) -> Result<HttpResponse, AppError> {
    let document = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(document))
}

/// GET /documents
pub async fn list_documents(
    service: Service,
    query: web::Query<ListDocumentsQuery>,
) -> Result<HttpResponse, AppError> {
    let documents = service.list(query.limit, query.offset).await?;
    Ok(HttpResponse::Ok().json(documents))
}

/// GET /documents/{id}
pub async fn get_document(
    service: Service,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let document = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(document))
}

/// DELETE /documents/{id}
pub async fn delete_document(
    service: Service,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /documents/{id}/items
pub async fn add_item(
    service: Service,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let document = service
        .apply(&path.into_inner(), LedgerOperation::AddItem)
        .await?;
    Ok(HttpResponse::Ok().json(document))
}

/// PATCH /documents/{id}/items/{item_id}
pub async fn edit_item(
    service: Service,
    path: web::Path<(String, String)>,
    request: web::Json<ItemEdit>,
) -> Result<HttpResponse, AppError> {
    let (id, item_id) = path.into_inner();
    let document = service
        .apply(
            &id,
            LedgerOperation::EditItem {
                item_id,
                edit: request.into_inner(),
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(document))
}

/// DELETE /documents/{id}/items/{item_id}
pub async fn remove_item(
    service: Service,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, item_id) = path.into_inner();
    let document = service
        .apply(&id, LedgerOperation::RemoveItem { item_id })
        .await?;
    Ok(HttpResponse::Ok().json(document))
}

/// PUT /documents/{id}/rates
pub async fn set_rates(
    service: Service,
    path: web::Path<String>,
    request: web::Json<SetRatesRequest>,
) -> Result<HttpResponse, AppError> {
    let SetRatesRequest {
        discount_percent,
        tax_percent,
    } = request.into_inner();
    let document = service
        .apply(
            &path.into_inner(),
            LedgerOperation::SetRates {
                discount_percent,
                tax_percent,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(document))
}

/// POST /documents/{id}/payments
pub async fn record_payment(
    service: Service,
    path: web::Path<String>,
    request: web::Json<RecordPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let payment = request.into_inner().into_payment();
    let document = service
        .apply(&path.into_inner(), LedgerOperation::RecordPayment(payment))
        .await?;
    Ok(HttpResponse::Ok().json(document))
}

/// DELETE /documents/{id}/payments/{payment_id}
pub async fn remove_payment(
    service: Service,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, payment_id) = path.into_inner();
    let document = service
        .apply(&id, LedgerOperation::RemovePayment { payment_id })
        .await?;
    Ok(HttpResponse::Ok().json(document))
}

/// POST /documents/{id}/complete
pub async fn mark_complete(
    service: Service,
    path: web::Path<String>,
    request: Option<web::Json<MarkCompleteRequest>>,
) -> Result<HttpResponse, AppError> {
    let settled_on = request
        .and_then(|body| body.into_inner().settled_on)
        .unwrap_or_else(|| Utc::now().date_naive());
    let document = service
        .apply(
            &path.into_inner(),
            LedgerOperation::MarkComplete { settled_on },
        )
        .await?;
    Ok(HttpResponse::Ok().json(document))
}

/// PUT /documents/{id}/status
pub async fn set_status(
    service: Service,
    path: web::Path<String>,
    request: web::Json<SetStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let document = service
        .apply(
            &path.into_inner(),
            LedgerOperation::SetStatus(request.status),
        )
        .await?;
    Ok(HttpResponse::Ok().json(document))
}

/// POST /documents/{id}/convert
pub async fn convert_to_invoice(
    service: Service,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.convert_to_invoice(&path.into_inner()).await?;
    Ok(HttpResponse::Created().json(invoice))
}

/// Configure document routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/documents")
            .route("", web::post().to(create_document))
            .route("", web::get().to(list_documents))
            .route("/{id}", web::get().to(get_document))
            .route("/{id}", web::delete().to(delete_document))
            .route("/{id}/items", web::post().to(add_item))
            .route("/{id}/items/{item_id}", web::patch().to(edit_item))
            .route("/{id}/items/{item_id}", web::delete().to(remove_item))
            .route("/{id}/rates", web::put().to(set_rates))
            .route("/{id}/payments", web::post().to(record_payment))
            .route(
                "/{id}/payments/{payment_id}",
                web::delete().to(remove_payment),
            )
            .route("/{id}/complete", web::post().to(mark_complete))
            .route("/{id}/status", web::put().to(set_status))
            .route("/{id}/convert", web::post().to(convert_to_invoice)),
    );
}
