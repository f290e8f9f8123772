use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::core::{AppError, Result, Toman};
use crate::modules::invoices::models::{
    Calculation, DocumentKind, DocumentTotals, InvoiceDocument, InvoiceStatus, ItemEdit, LineItem,
    NewDocument, Payment, PaymentMethod,
};

/// Reference stamped on the balancing payment added by `mark_complete`
pub const SETTLEMENT_REFERENCE: &str = "settlement";

/// Computation engine for quotation/invoice documents
///
/// Every operation takes the current document by reference and returns the
/// next document, so a failed operation leaves the caller's copy untouched.
/// Derived totals are recomputed from scratch on every mutation:
///
/// * subtotal = Σ item.total
/// * discount_amount = round(subtotal × discount% / 100)
/// * tax_amount = round((subtotal − discount_amount) × tax% / 100)
/// * total = subtotal − discount_amount + tax_amount
/// * paid_amount = Σ payment.amount
/// * remaining_amount = total − paid_amount (negative when overpaid)
pub struct InvoiceLedger;

impl InvoiceLedger {
    /// Compute subtotal, discount, tax and total for a set of items
    ///
    /// Percentages outside 0..=100 are rejected, never clamped.
    pub fn recalculate(
        items: &[LineItem],
        discount_percent: Decimal,
        tax_percent: Decimal,
    ) -> Result<Calculation> {
        Self::validate_percent("Discount", discount_percent)?;
        Self::validate_percent("Tax", tax_percent)?;

        Self::calculate(items, discount_percent, tax_percent)
    }

    /// Build a new draft document with a generated number
    ///
    /// Starts with the supplied items, or a single blank item when none are given.
    pub fn create(input: NewDocument, now: DateTime<Utc>) -> Result<InvoiceDocument> {
        Self::validate_percent("Discount", input.discount_percent)?;
        Self::validate_percent("Tax", input.tax_percent)?;

        if input.client_id.trim().is_empty() {
            return Err(AppError::validation("Client ID cannot be empty"));
        }

        if let Some(due_date) = input.due_date {
            if input.kind == DocumentKind::Quotation {
                return Err(AppError::validation("Quotations cannot carry a due date"));
            }
            if due_date < input.date {
                return Err(AppError::validation(format!(
                    "Due date {} precedes document date {}",
                    due_date, input.date
                )));
            }
        }

        let mut items = input
            .items
            .into_iter()
            .map(LineItem::from_input)
            .collect::<Result<Vec<_>>>()?;
        if items.is_empty() {
            items.push(LineItem::blank());
        }

        let mut document = InvoiceDocument {
            id: Uuid::new_v4().to_string(),
            client_id: input.client_id,
            client_name: input.client_name,
            employee_name: input.employee_name,
            number: input.kind.number_at(now),
            kind: input.kind,
            date: input.date,
            due_date: input.due_date,
            notes: input.notes,
            items,
            payments: Vec::new(),
            discount_percent: input.discount_percent.normalize(),
            tax_percent: input.tax_percent.normalize(),
            totals: DocumentTotals::default(),
            status: InvoiceStatus::Draft,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        Self::refresh(&mut document)?;

        debug!(
            document_id = %document.id,
            number = %document.number,
            kind = %document.kind,
            total = %document.totals.total,
            "Document created"
        );

        Ok(document)
    }

    /// Append a blank item (quantity 1, price 0)
    pub fn add_item(document: &InvoiceDocument) -> InvoiceDocument {
        // a blank row adds nothing, totals carry over unchanged
        let mut next = document.clone();
        next.items.push(LineItem::blank());

        debug!(document_id = %next.id, items = next.items.len(), "Item added");

        next
    }

    /// Remove an item; a document may end up with no items at all
    pub fn remove_item(document: &InvoiceDocument, item_id: &str) -> Result<InvoiceDocument> {
        let position = Self::item_position(document, item_id)?;

        let mut next = document.clone();
        next.items.remove(position);
        Self::refresh(&mut next)?;
        Self::reopen_if_underpaid(&mut next);

        debug!(
            document_id = %next.id,
            item_id = %item_id,
            total = %next.totals.total,
            "Item removed"
        );

        Ok(next)
    }

    /// Change one field of an item and recompute everything downstream
    pub fn edit_item(
        document: &InvoiceDocument,
        item_id: &str,
        edit: ItemEdit,
    ) -> Result<InvoiceDocument> {
        let position = Self::item_position(document, item_id)?;
        let edited = document.items[position].with_edit(edit)?;

        let mut next = document.clone();
        next.items[position] = edited;
        Self::refresh(&mut next)?;
        Self::reopen_if_underpaid(&mut next);

        debug!(
            document_id = %next.id,
            item_id = %item_id,
            subtotal = %next.totals.subtotal,
            total = %next.totals.total,
            "Item edited"
        );

        Ok(next)
    }

    /// Change discount and tax percentages
    pub fn set_rates(
        document: &InvoiceDocument,
        discount_percent: Decimal,
        tax_percent: Decimal,
    ) -> Result<InvoiceDocument> {
        Self::validate_percent("Discount", discount_percent)?;
        Self::validate_percent("Tax", tax_percent)?;

        let mut next = document.clone();
        next.discount_percent = discount_percent.normalize();
        next.tax_percent = tax_percent.normalize();
        Self::refresh(&mut next)?;
        Self::reopen_if_underpaid(&mut next);

        debug!(
            document_id = %next.id,
            discount_percent = %next.discount_percent,
            tax_percent = %next.tax_percent,
            total = %next.totals.total,
            "Rates changed"
        );

        Ok(next)
    }

    /// Record a payment against an invoice
    ///
    /// Status moves forward only: fully covered → paid, otherwise draft → sent.
    /// Overpayment is kept as a negative remaining amount.
    pub fn record_payment(document: &InvoiceDocument, payment: Payment) -> Result<InvoiceDocument> {
        if document.is_quotation() {
            return Err(AppError::invalid_operation(format!(
                "Quotation {} cannot accept payments",
                document.number
            )));
        }
        payment.validate()?;
        if document.payments.iter().any(|existing| existing.id == payment.id) {
            return Err(AppError::validation(format!(
                "Payment {} is already recorded on document {}",
                payment.id, document.number
            )));
        }

        let mut next = document.clone();
        next.payments.push(Payment {
            amount: Toman::whole(payment.amount),
            ..payment
        });
        Self::refresh(&mut next)?;

        if next.totals.remaining_amount <= Decimal::ZERO {
            next.status = InvoiceStatus::Paid;
        } else if next.status == InvoiceStatus::Draft {
            next.status = InvoiceStatus::Sent;
        }

        debug!(
            document_id = %next.id,
            paid = %Toman::format_amount(next.totals.paid_amount),
            remaining = %Toman::format_amount(next.totals.remaining_amount),
            status = %next.status,
            "Payment recorded"
        );

        Ok(next)
    }

    /// Remove a previously recorded payment
    pub fn remove_payment(document: &InvoiceDocument, payment_id: &str) -> Result<InvoiceDocument> {
        let position = document
            .payments
            .iter()
            .position(|payment| payment.id == payment_id)
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Payment {} on document {}",
                    payment_id, document.number
                ))
            })?;

        let mut next = document.clone();
        next.payments.remove(position);
        Self::refresh(&mut next)?;
        Self::reopen_if_underpaid(&mut next);

        debug!(
            document_id = %next.id,
            payment_id = %payment_id,
            remaining = %next.totals.remaining_amount,
            status = %next.status,
            "Payment removed"
        );

        Ok(next)
    }

    /// Close an invoice: record the shortfall as a settlement payment, then mark paid
    pub fn mark_complete(document: &InvoiceDocument, settled_on: NaiveDate) -> Result<InvoiceDocument> {
        if document.is_quotation() {
            return Err(AppError::invalid_operation(format!(
                "Quotation {} cannot be marked as paid",
                document.number
            )));
        }

        let mut next = document.clone();
        let shortfall = next.totals.remaining_amount;
        if shortfall > Decimal::ZERO {
            next.payments.push(Payment::new(
                shortfall,
                PaymentMethod::Cash,
                settled_on,
                Some(SETTLEMENT_REFERENCE.to_string()),
            ));
            Self::refresh(&mut next)?;
        }
        next.status = InvoiceStatus::Paid;

        debug!(
            document_id = %next.id,
            settled = %shortfall.max(Decimal::ZERO),
            "Document marked complete"
        );

        Ok(next)
    }

    /// Operator override; the only way status moves backward
    ///
    /// Setting `paid` is refused while a balance is outstanding (use
    /// `mark_complete`) and always refused for quotations.
    pub fn set_status(document: &InvoiceDocument, status: InvoiceStatus) -> Result<InvoiceDocument> {
        if status == InvoiceStatus::Paid {
            if document.is_quotation() {
                return Err(AppError::invalid_operation(format!(
                    "Quotation {} cannot be marked as paid",
                    document.number
                )));
            }
            if document.totals.remaining_amount > Decimal::ZERO {
                return Err(AppError::invalid_operation(format!(
                    "Document {} still has {} outstanding; mark it complete instead",
                    document.number,
                    Toman::format_amount(document.totals.remaining_amount)
                )));
            }
        }

        let mut next = document.clone();
        next.status = status;

        debug!(
            document_id = %next.id,
            from = %document.status,
            to = %status,
            "Status overridden"
        );

        Ok(next)
    }

    /// Status override issued by the overdue sweep
    ///
    /// Only a draft or sent invoice with a balance outstanding past its due
    /// date qualifies; anything else is refused so a payment that landed
    /// after the sweep listed the document is never overwritten.
    pub fn mark_overdue(document: &InvoiceDocument, as_of: NaiveDate) -> Result<InvoiceDocument> {
        let open = matches!(document.status, InvoiceStatus::Draft | InvoiceStatus::Sent);
        if !open || !document.is_past_due(as_of) {
            return Err(AppError::invalid_operation(format!(
                "Document {} ({}) is not overdue as of {}",
                document.number, document.status, as_of
            )));
        }

        Self::set_status(document, InvoiceStatus::Overdue)
    }

    /// Issue a new draft invoice from a quotation's client, items and rates
    pub fn convert_to_invoice(document: &InvoiceDocument, now: DateTime<Utc>) -> Result<InvoiceDocument> {
        if !document.is_quotation() {
            return Err(AppError::invalid_operation(format!(
                "Document {} is already an invoice",
                document.number
            )));
        }

        let mut invoice = InvoiceDocument {
            id: Uuid::new_v4().to_string(),
            client_id: document.client_id.clone(),
            client_name: document.client_name.clone(),
            employee_name: document.employee_name.clone(),
            number: DocumentKind::Invoice.number_at(now),
            kind: DocumentKind::Invoice,
            date: now.date_naive(),
            due_date: None,
            notes: document.notes.clone(),
            items: document.items.iter().map(LineItem::duplicate).collect(),
            payments: Vec::new(),
            discount_percent: document.discount_percent,
            tax_percent: document.tax_percent,
            totals: DocumentTotals::default(),
            status: InvoiceStatus::Draft,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        Self::refresh(&mut invoice)?;

        debug!(
            quotation = %document.number,
            invoice = %invoice.number,
            total = %invoice.totals.total,
            "Quotation converted"
        );

        Ok(invoice)
    }

    fn calculate(
        items: &[LineItem],
        discount_percent: Decimal,
        tax_percent: Decimal,
    ) -> Result<Calculation> {
        let subtotal = Toman::sum(items.iter().map(LineItem::total))?;
        let discount_amount = Toman::percent_of(subtotal, discount_percent)?;
        let tax_amount = Toman::percent_of(subtotal - discount_amount, tax_percent)?;

        Ok(Calculation {
            subtotal,
            discount_amount,
            tax_amount,
            total: Toman::sum([subtotal - discount_amount, tax_amount])?,
        })
    }

    /// Recompute every derived amount from the document's inputs
    ///
    /// Fails only when a sum leaves the representable range; the document
    /// is a scratch copy at that point and gets dropped by the caller.
    fn refresh(document: &mut InvoiceDocument) -> Result<()> {
        let calculation = Self::calculate(
            &document.items,
            document.discount_percent,
            document.tax_percent,
        )?;
        let paid_amount = Toman::sum(document.payments.iter().map(|p| p.amount))?;

        document.totals = DocumentTotals {
            subtotal: calculation.subtotal,
            discount_amount: calculation.discount_amount,
            tax_amount: calculation.tax_amount,
            total: calculation.total,
            paid_amount,
            remaining_amount: calculation.total - paid_amount,
        };

        Ok(())
    }

    /// A paid invoice whose balance reopened goes back to sent
    fn reopen_if_underpaid(document: &mut InvoiceDocument) {
        if document.status == InvoiceStatus::Paid
            && document.totals.remaining_amount > Decimal::ZERO
        {
            debug!(
                document_id = %document.id,
                remaining = %document.totals.remaining_amount,
                "Paid document reopened"
            );
            document.status = InvoiceStatus::Sent;
        }
    }

    fn item_position(document: &InvoiceDocument, item_id: &str) -> Result<usize> {
        document
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| {
                AppError::not_found(format!("Item {} on document {}", item_id, document.number))
            })
    }

    fn validate_percent(name: &str, percent: Decimal) -> Result<()> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(AppError::validation(format!(
                "{} percent must be between 0 and 100, got: {}",
                name, percent
            )));
        }

        Ok(())
    }
}
