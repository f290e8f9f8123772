mod document;
mod line_item;
mod payment;

pub use document::{
    Calculation, DocumentKind, DocumentTotals, InvoiceDocument, InvoiceStatus, NewDocument,
};
pub use line_item::{ItemEdit, LineItem, LineItemInput};
pub use payment::{Payment, PaymentMethod};
