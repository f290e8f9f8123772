use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::ledger::InvoiceLedger;
use super::operation::LedgerOperation;
use crate::core::error::{AppError, Result};
use crate::modules::invoices::models::{InvoiceDocument, NewDocument};
use crate::modules::invoices::repositories::InvoiceRepository;

/// Wires the ledger to the repository
///
/// Every mutation is load → ledger operation → compare-and-swap save. A
/// version conflict means another writer got there first; the operation is
/// replayed against the fresh copy up to `max_write_attempts` times.
pub struct InvoiceService {
    invoice_repo: Arc<dyn InvoiceRepository>,
    max_write_attempts: u32,
}

impl InvoiceService {
    pub fn new(invoice_repo: Arc<dyn InvoiceRepository>, max_write_attempts: u32) -> Self {
        Self {
            invoice_repo,
            max_write_attempts: max_write_attempts.max(1),
        }
    }

    /// Create and store a new draft document
    pub async fn create(&self, input: NewDocument) -> Result<InvoiceDocument> {
        let document = InvoiceLedger::create(input, Utc::now())?;
        let stored = self.invoice_repo.insert(&document).await?;

        info!(
            document_id = %stored.id,
            number = %stored.number,
            kind = %stored.kind,
            "Document created"
        );

        Ok(stored)
    }

    pub async fn get(&self, id: &str) -> Result<InvoiceDocument> {
        self.invoice_repo.load(id).await
    }

    pub async fn list(&self, limit: usize, offset: usize) -> Result<Vec<InvoiceDocument>> {
        self.invoice_repo.list(limit, offset).await
    }

    /// Every stored document at one point in time, for sweeps and reports
    pub async fn snapshot(&self) -> Result<Vec<InvoiceDocument>> {
        self.invoice_repo.snapshot().await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.invoice_repo.delete(id).await?;
        info!(document_id = %id, "Document deleted");
        Ok(())
    }

    /// Apply one ledger operation to a stored document
    pub async fn apply(&self, id: &str, operation: LedgerOperation) -> Result<InvoiceDocument> {
        let mut attempt = 1;

        loop {
            let current = self.invoice_repo.load(id).await?;
            let next = operation.apply(&current)?;

            match self.invoice_repo.save(&next).await {
                Ok(saved) => {
                    info!(
                        document_id = %saved.id,
                        operation = operation.name(),
                        version = saved.version,
                        status = %saved.status(),
                        "Document updated"
                    );
                    return Ok(saved);
                }
                Err(AppError::VersionConflict(reason)) if attempt < self.max_write_attempts => {
                    warn!(
                        document_id = %id,
                        operation = operation.name(),
                        attempt = attempt,
                        reason = %reason,
                        "Version conflict, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Store a new invoice built from a stored quotation
    pub async fn convert_to_invoice(&self, quotation_id: &str) -> Result<InvoiceDocument> {
        let quotation = self.invoice_repo.load(quotation_id).await?;
        let invoice = InvoiceLedger::convert_to_invoice(&quotation, Utc::now())?;
        let stored = self.invoice_repo.insert(&invoice).await?;

        info!(
            quotation = %quotation.number,
            invoice = %stored.number,
            "Quotation converted to invoice"
        );

        Ok(stored)
    }
}
