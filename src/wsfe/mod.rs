//! WSFEv1 call gateway.
//!
//! Each operation is one round trip through a [`SoapTransport`]: acquire a
//! client for the configured endpoint, submit the shaped payload, unwrap the
//! `<Operation>Result` field and normalize embedded error codes.
//!
//! # Example
//!
//! ```ignore
//! use wsfev1::core::*;
//! use wsfev1::wsfe::*;
//!
//! let config = EndpointConfig::from_env()?;
//! let gateway = Wsfev1Gateway::new(config, my_soap_transport);
//! let creds = Credentials::new(token, sign, 20123456789);
//!
//! let last = gateway
//!     .fetch_last_authorized_number(&creds, InvoiceQuery::new(1, codes::INVOICE_B))
//!     .await?;
//! ```

mod envelope;
mod error;
mod gateway;
mod transport;

pub use envelope::Operation;
pub use error::{GatewayError, TransportError};
pub use gateway::Wsfev1Gateway;
pub use transport::SoapTransport;
