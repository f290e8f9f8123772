pub mod controllers;
pub mod models;
pub mod services;

pub use models::ReceivablesSummary;
pub use services::ReportService;
