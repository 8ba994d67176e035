//! Invoice storage boundary.
//!
//! The payment flow only needs keyed get/save; creation flows use `add_invoice`.
//! No storage assumptions are made here.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryInvoiceStore;
pub use r#trait::{InvoiceStore, StoreError};
