mod receivables_summary;

pub use receivables_summary::{ReceivablesSummary, StatusCount};
