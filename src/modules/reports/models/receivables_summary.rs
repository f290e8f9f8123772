use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{Result, Toman};
use crate::modules::invoices::models::{DocumentKind, InvoiceDocument, InvoiceStatus};

/// Number of documents in one status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: InvoiceStatus,
    pub count: usize,
}

/// What clients owe, aggregated over stored documents
///
/// Quotations only contribute to the counts; money figures come from invoices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceivablesSummary {
    /// Inclusive document-date window, if one was requested
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub invoice_count: usize,
    pub quotation_count: usize,
    pub by_status: Vec<StatusCount>,
    /// Σ invoice total
    pub total_invoiced: Decimal,
    /// Σ invoice paid_amount
    pub total_paid: Decimal,
    /// Σ positive remaining_amount
    pub outstanding: Decimal,
    /// Σ overpayment held for refund
    pub credit: Decimal,
    /// Outstanding on invoices currently marked overdue
    pub overdue_outstanding: Decimal,
}

impl ReceivablesSummary {
    pub fn from_documents<'a, I>(
        documents: I,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = &'a InvoiceDocument>,
    {
        let mut summary = Self {
            from,
            to,
            invoice_count: 0,
            quotation_count: 0,
            by_status: [
                InvoiceStatus::Draft,
                InvoiceStatus::Sent,
                InvoiceStatus::Paid,
                InvoiceStatus::Overdue,
            ]
            .into_iter()
            .map(|status| StatusCount { status, count: 0 })
            .collect(),
            total_invoiced: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            outstanding: Decimal::ZERO,
            credit: Decimal::ZERO,
            overdue_outstanding: Decimal::ZERO,
        };

        let in_window = |doc: &InvoiceDocument| {
            from.map_or(true, |f| doc.date >= f) && to.map_or(true, |t| doc.date <= t)
        };

        for doc in documents.into_iter().filter(|doc| in_window(*doc)) {
            if let Some(entry) = summary
                .by_status
                .iter_mut()
                .find(|entry| entry.status == doc.status())
            {
                entry.count += 1;
            }

            match doc.kind {
                DocumentKind::Quotation => summary.quotation_count += 1,
                DocumentKind::Invoice => {
                    let totals = doc.totals();
                    summary.invoice_count += 1;
                    accumulate(&mut summary.total_invoiced, totals.total)?;
                    accumulate(&mut summary.total_paid, totals.paid_amount)?;
                    accumulate(&mut summary.outstanding, doc.display_remaining())?;
                    accumulate(&mut summary.credit, doc.credit())?;
                    if doc.status() == InvoiceStatus::Overdue {
                        accumulate(&mut summary.overdue_outstanding, doc.display_remaining())?;
                    }
                }
            }
        }

        Ok(summary)
    }

    pub fn count_for(&self, status: InvoiceStatus) -> usize {
        self.by_status
            .iter()
            .find(|entry| entry.status == status)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

fn accumulate(total: &mut Decimal, amount: Decimal) -> Result<()> {
    *total = Toman::sum([*total, amount])?;
    Ok(())
}
