use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::invoices::services::InvoiceService;
use crate::modules::reports::models::ReceivablesSummary;

/// Service for generating receivables reports
pub struct ReportService {
    invoice_service: Arc<InvoiceService>,
}

impl ReportService {
    pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
        Self { invoice_service }
    }

    /// Summarize documents dated within `from..=to` (either bound optional)
    ///
    /// # Errors
    /// Returns a validation error if `from` is after `to`
    pub async fn receivables(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<ReceivablesSummary> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::validation(format!(
                    "from ({}) must be before or equal to to ({})",
                    from, to
                )));
            }
        }

        let documents = self.invoice_service.snapshot().await?;

        let summary = ReceivablesSummary::from_documents(&documents, from, to)?;

        info!(
            from = ?from,
            to = ?to,
            invoices = summary.invoice_count,
            outstanding = %summary.outstanding,
            "Receivables report generated"
        );

        Ok(summary)
    }
}
