//! Daftar: quotation and invoice ledger
//!
//! Derived totals, payments and the status lifecycle of quotations and
//! invoices, exposed over a small JSON API.

pub mod config;
pub mod core;
pub mod modules;

use actix_web::web;

// Re-export commonly used types
pub use modules::invoices;
pub use modules::reports;

/// Register every HTTP route; callers supply `Arc<InvoiceService>` and
/// `Arc<ReportService>` as app data
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(modules::health::controllers::configure)
        .configure(modules::invoices::controllers::configure)
        .configure(modules::reports::controllers::configure);
}
