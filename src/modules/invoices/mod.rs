// Invoices module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{DocumentKind, InvoiceDocument, InvoiceStatus, LineItem, Payment};
pub use repositories::{InMemoryInvoiceRepository, InvoiceRepository};
pub use services::{InvoiceLedger, InvoiceService, LedgerOperation};
