//! Core WSFEv1 types, endpoint configuration, and request builders.
//!
//! Everything in here is plain data: no I/O, no transport. The
//! [`crate::wsfe`] gateway consumes these types.

mod builder;
pub mod codes;
mod config;
mod error;
mod serde_util;
mod types;

pub use builder::*;
pub use codes::{is_known_doc_type, is_known_invoice_type, vat_rate};
pub use config::*;
pub use error::*;
pub use types::*;
