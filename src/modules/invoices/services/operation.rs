use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::ledger::InvoiceLedger;
use crate::core::Result;
use crate::modules::invoices::models::{
    InvoiceDocument, InvoiceStatus, ItemEdit, Payment, PaymentMethod,
};

/// A mutation of a stored document, replayable after a version conflict
#[derive(Debug, Clone)]
pub enum LedgerOperation {
    AddItem,
    RemoveItem { item_id: String },
    EditItem { item_id: String, edit: ItemEdit },
    SetRates { discount_percent: Decimal, tax_percent: Decimal },
    RecordPayment(Payment),
    RemovePayment { payment_id: String },
    MarkComplete { settled_on: NaiveDate },
    SetStatus(InvoiceStatus),
    MarkOverdue { as_of: NaiveDate },
}

impl LedgerOperation {
    pub fn apply(&self, document: &InvoiceDocument) -> Result<InvoiceDocument> {
        match self {
            LedgerOperation::AddItem => Ok(InvoiceLedger::add_item(document)),
            LedgerOperation::RemoveItem { item_id } => InvoiceLedger::remove_item(document, item_id),
            LedgerOperation::EditItem { item_id, edit } => {
                InvoiceLedger::edit_item(document, item_id, edit.clone())
            }
            LedgerOperation::SetRates {
                discount_percent,
                tax_percent,
            } => InvoiceLedger::set_rates(document, *discount_percent, *tax_percent),
            LedgerOperation::RecordPayment(payment) => {
                InvoiceLedger::record_payment(document, payment.clone())
            }
            LedgerOperation::RemovePayment { payment_id } => {
                InvoiceLedger::remove_payment(document, payment_id)
            }
            LedgerOperation::MarkComplete { settled_on } => {
                InvoiceLedger::mark_complete(document, *settled_on)
            }
            LedgerOperation::SetStatus(status) => InvoiceLedger::set_status(document, *status),
            LedgerOperation::MarkOverdue { as_of } => InvoiceLedger::mark_overdue(document, *as_of),
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            LedgerOperation::AddItem => "add_item",
            LedgerOperation::RemoveItem { .. } => "remove_item",
            LedgerOperation::EditItem { .. } => "edit_item",
            LedgerOperation::SetRates { .. } => "set_rates",
            LedgerOperation::RecordPayment(_) => "record_payment",
            LedgerOperation::RemovePayment { .. } => "remove_payment",
            LedgerOperation::MarkComplete { .. } => "mark_complete",
            LedgerOperation::SetStatus(_) => "set_status",
            LedgerOperation::MarkOverdue { .. } => "mark_overdue",
        }
    }
}

/// Body of `PUT /documents/{id}/rates`
#[derive(Debug, Clone, Deserialize)]
pub struct SetRatesRequest {
    pub discount_percent: Decimal,
    pub tax_percent: Decimal,
}

/// Body of `POST /documents/{id}/payments`
///
/// Carries no id: the server assigns one when the payment is built, before
/// any retry, so a replayed write records the same payment.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub date: NaiveDate,
    #[serde(default)]
    pub reference: Option<String>,
}

impl RecordPaymentRequest {
    pub fn into_payment(self) -> Payment {
        Payment::new(self.amount, self.method, self.date, self.reference)
    }
}

/// Body of `PUT /documents/{id}/status`
#[derive(Debug, Clone, Deserialize)]
pub struct SetStatusRequest {
    pub status: InvoiceStatus,
}

/// Body of `POST /documents/{id}/complete`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkCompleteRequest {
    /// Defaults to today when omitted
    #[serde(default)]
    pub settled_on: Option<NaiveDate>,
}
