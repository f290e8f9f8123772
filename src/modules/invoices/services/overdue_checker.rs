use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use super::invoice_service::InvoiceService;
use super::operation::LedgerOperation;
use crate::core::error::{AppError, Result};
use crate::modules::invoices::models::InvoiceStatus;

/// Background job that flags unpaid invoices past their due date
///
/// Every tick scans the repository for draft or sent invoices with a balance
/// outstanding and a due date before today, then moves them to `overdue`
/// through the regular service path so concurrent payments are respected.
pub struct OverdueChecker {
    service: Arc<InvoiceService>,
    period: Duration,
}

impl OverdueChecker {
    pub fn new(service: Arc<InvoiceService>, period: Duration) -> Self {
        Self { service, period }
    }

    /// Run forever; spawn this as a tokio task
    pub async fn start(self: Arc<Self>) {
        info!(
            period_secs = self.period.as_secs(),
            "Starting overdue invoice checker"
        );

        let mut ticker = interval(self.period);

        loop {
            ticker.tick().await;

            match self.run_once(Utc::now().date_naive()).await {
                Ok(marked) => {
                    if marked > 0 {
                        info!(marked = marked, "Overdue invoices processed");
                    }
                }
                Err(e) => {
                    error!(error = %e, "Error checking overdue invoices");
                }
            }
        }
    }

    /// One sweep as of `today`; returns how many invoices were marked
    pub async fn run_once(&self, today: NaiveDate) -> Result<usize> {
        debug!(as_of = %today, "Checking for overdue invoices");

        let candidates: Vec<String> = self
            .service
            .snapshot()
            .await?
            .into_iter()
            .filter(|doc| {
                matches!(doc.status(), InvoiceStatus::Draft | InvoiceStatus::Sent)
                    && doc.is_past_due(today)
            })
            .map(|doc| doc.id)
            .collect();

        let mut marked = 0;
        for id in candidates {
            match self
                .service
                .apply(&id, LedgerOperation::MarkOverdue { as_of: today })
                .await
            {
                Ok(doc) => {
                    info!(
                        document_id = %doc.id,
                        number = %doc.number,
                        due_date = ?doc.due_date,
                        "Invoice marked overdue"
                    );
                    marked += 1;
                }
                // Paid or re-dated since it was listed
                Err(AppError::InvalidOperation(reason)) => {
                    debug!(document_id = %id, reason = %reason, "Skipping invoice");
                }
                Err(e) => {
                    warn!(document_id = %id, error = %e, "Could not mark invoice overdue");
                }
            }
        }

        Ok(marked)
    }
}
