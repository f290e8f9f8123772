// Quotation/invoice document model.
//
// Identity and pass-through fields are public. Items, payments, rates,
// totals and status are only changed by the ledger so the derived totals
// can never drift from their inputs.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line_item::{LineItem, LineItemInput};
use super::payment::Payment;
use crate::core::Toman;

/// Quotations are estimates; only invoices accrue payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Quotation,
    Invoice,
}

impl DocumentKind {
    /// Human-readable number prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Quotation => "QF",
            DocumentKind::Invoice => "INV",
        }
    }

    /// Document number: prefix plus the last six digits of the millisecond timestamp
    pub fn number_at(&self, now: DateTime<Utc>) -> String {
        format!(
            "{}-{:06}",
            self.prefix(),
            now.timestamp_millis().rem_euclid(1_000_000)
        )
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Quotation => write!(f, "quotation"),
            DocumentKind::Invoice => write!(f, "invoice"),
        }
    }
}

/// Document status lifecycle: draft → sent → paid, overdue set by the sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Created, not yet sent to the client
    #[default]
    Draft,

    /// Sent to the client, or partially paid
    Sent,

    /// Fully paid (soft terminal)
    Paid,

    /// Past its due date with a balance outstanding
    Overdue,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Draft => write!(f, "draft"),
            InvoiceStatus::Sent => write!(f, "sent"),
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Overdue => write!(f, "overdue"),
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "draft" => Ok(InvoiceStatus::Draft),
            "sent" => Ok(InvoiceStatus::Sent),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            _ => Err(format!("Invalid invoice status: {}", s)),
        }
    }
}

/// Amounts derived from items, rates and payments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentTotals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub paid_amount: Decimal,
    /// total - paid_amount; negative when overpaid
    pub remaining_amount: Decimal,
}

/// The four amounts `recalculate` produces from items and rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Calculation {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// A quotation or invoice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDocument {
    pub id: String,
    pub client_id: String,
    /// Resolved by the client directory, carried as-is
    pub client_name: Option<String>,
    /// Resolved by the employee directory, carried as-is
    pub employee_name: Option<String>,
    pub number: String,
    #[serde(rename = "document_kind")]
    pub kind: DocumentKind,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,

    pub(crate) items: Vec<LineItem>,
    pub(crate) payments: Vec<Payment>,
    pub(crate) discount_percent: Decimal,
    pub(crate) tax_percent: Decimal,
    #[serde(flatten)]
    pub(crate) totals: DocumentTotals,
    pub(crate) status: InvoiceStatus,

    /// Optimistic-concurrency version, bumped by the repository on save
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvoiceDocument {
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn discount_percent(&self) -> Decimal {
        self.discount_percent
    }

    pub fn tax_percent(&self) -> Decimal {
        self.tax_percent
    }

    pub fn totals(&self) -> &DocumentTotals {
        &self.totals
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn is_quotation(&self) -> bool {
        self.kind == DocumentKind::Quotation
    }

    /// Remaining balance for display; overpayment shows as zero
    pub fn display_remaining(&self) -> Decimal {
        Toman::display_remaining(self.totals.remaining_amount)
    }

    /// Amount paid beyond the total, kept for refund reconciliation
    pub fn credit(&self) -> Decimal {
        (-self.totals.remaining_amount).max(Decimal::ZERO)
    }

    /// Open invoice past its due date
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => {
                self.kind == DocumentKind::Invoice
                    && due < today
                    && self.totals.remaining_amount > Decimal::ZERO
            }
            None => false,
        }
    }
}

/// Input for creating a document
#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    #[serde(rename = "document_kind")]
    pub kind: DocumentKind,
    pub client_id: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub employee_name: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub discount_percent: Decimal,
    #[serde(default)]
    pub tax_percent: Decimal,
}
