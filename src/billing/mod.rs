//! Invoice arithmetic and numbering.

pub mod calculator;
pub mod line_items;
pub mod numbering;

pub use calculator::{BillingRates, InvoiceDraft, InvoiceTotals, PAYMENT_TERM_DAYS};
pub use line_items::{DetailError, LaborLine, PartCondition, PartLine, decode_labor, decode_parts};
pub use numbering::{assign_invoice_number, format_invoice_number, next_after, parse_invoice_number};
