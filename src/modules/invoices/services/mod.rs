pub mod invoice_service;
pub mod ledger;
pub mod operation;
pub mod overdue_checker;

pub use invoice_service::InvoiceService;
pub use ledger::{InvoiceLedger, SETTLEMENT_REFERENCE};
pub use operation::{
    LedgerOperation, MarkCompleteRequest, RecordPaymentRequest, SetRatesRequest, SetStatusRequest,
};
pub use overdue_checker::OverdueChecker;
