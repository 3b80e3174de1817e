//! # wsfev1
//!
//! Gateway to AFIP's WSFEv1 electronic invoice authorization service.
//!
//! The crate selects the service endpoint for a deployment mode, shapes
//! typed requests for `FECompUltimoAutorizado` and `FECAESolicitar`, hands
//! them to a SOAP transport you supply, and normalizes the response: the
//! result field is unwrapped and application errors embedded in an
//! otherwise successful response become a hard [`wsfe::GatewayError`].
//!
//! All amounts use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use wsfev1::core::*;
//! use rust_decimal_macros::dec;
//!
//! let config = EndpointConfig::resolve("development").unwrap();
//! assert_eq!(config.service_endpoint(), HOMOLOGATION_ENDPOINT);
//!
//! let request = AuthorizationRequestBuilder::new(1, codes::INVOICE_B)
//!     .add_detail(
//!         DetailBuilder::new(Concept::Products, codes::DOC_UNIDENTIFIED, 0, 1,
//!                            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!             .net(dec!(1000))
//!             .add_vat(5, dec!(1000), dec!(210))
//!             .build()
//!             .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//! assert_eq!(request.details[0].total, dec!(1210));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Types, endpoint configuration, request builders |
//! | `gateway` (default) | `SoapTransport` seam and the call gateway |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "gateway")]
pub mod wsfe;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
