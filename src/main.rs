use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use daftar::config::{Config, LogFormat};
use daftar::invoices::services::{InvoiceService, OverdueChecker};
use daftar::invoices::InMemoryInvoiceRepository;
use daftar::reports::ReportService;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("daftar={},actix_web=info", config.app.log_level).into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting Daftar invoice ledger");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let repository = Arc::new(InMemoryInvoiceRepository::new());
    let invoice_service = Arc::new(InvoiceService::new(
        repository,
        config.ledger.max_write_attempts,
    ));
    let report_service = Arc::new(ReportService::new(invoice_service.clone()));

    // Overdue sweep
    let checker = Arc::new(OverdueChecker::new(
        invoice_service.clone(),
        config.ledger.overdue_check_interval(),
    ));
    tokio::spawn(checker.start());

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(invoice_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .configure(daftar::configure)
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
