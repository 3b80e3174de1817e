use thiserror::Error;

use crate::core::{ApiMessage, join_messages};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by the SOAP transport: network, WSDL or SOAP fault.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    /// Wrap an underlying error, keeping it as the source.
    pub fn new(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by [`crate::wsfe::Wsfev1Gateway`] operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The transport failed. Passed through untouched.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response envelope lacks the expected result field, or the field
    /// does not have the expected shape.
    #[error("{operation}: cannot unwrap {field}: {reason}")]
    Unwrap {
        operation: &'static str,
        field: &'static str,
        reason: String,
    },

    /// The request could not be encoded for the transport.
    #[error("payload error: {0}")]
    Payload(String),

    /// The service answered, but reported application errors.
    #[error("{}", join_messages(.errors))]
    RemoteApplication { errors: Vec<ApiMessage> },

    /// The operation is declared by the service but not supported here.
    #[error("operation {0} is not supported")]
    Unsupported(&'static str),
}

impl GatewayError {
    /// Remote error codes, if this is a `RemoteApplication` error.
    pub fn remote_errors(&self) -> &[ApiMessage] {
        match self {
            Self::RemoteApplication { errors } => errors.as_slice(),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn remote_application_message() {
        let err = GatewayError::RemoteApplication {
            errors: vec![
                ApiMessage::new(10015, "CUIT no autorizado"),
                ApiMessage::new(10016, "Numero de comprobante invalido"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "10015 - CUIT no autorizado, 10016 - Numero de comprobante invalido"
        );
        assert_eq!(err.remote_errors().len(), 2);
    }

    #[test]
    fn transport_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = GatewayError::from(TransportError::new("connect failed", io));
        assert_eq!(err.to_string(), "connect failed");
        assert_eq!(err.source().unwrap().to_string(), "refused");
        assert!(err.remote_errors().is_empty());
    }
}
