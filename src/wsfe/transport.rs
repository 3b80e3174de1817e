use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::error::TransportError;
use crate::core::EndpointConfig;

/// The SOAP client capability the gateway delegates to.
///
/// Implementations own WSDL loading, XML (de)serialization and HTTP. The
/// payload is the request body of the operation as a JSON-like tree; the
/// result is the deserialized response body, which wraps the actual result
/// in an `<Operation>Result` field.
///
/// Timeouts, if any, are the implementation's business. The gateway never
/// retries.
#[async_trait]
pub trait SoapTransport: Send + Sync {
    type Client: Send + Sync;

    /// Build a client for the configured WSDL and service endpoint.
    async fn create_client(&self, config: &EndpointConfig) -> Result<Self::Client, TransportError>;

    /// Invoke `operation` with `payload` and return the raw response body.
    async fn call_endpoint(
        &self,
        client: &Self::Client,
        operation: &str,
        payload: Value,
    ) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: SoapTransport + ?Sized> SoapTransport for Arc<T> {
    type Client = T::Client;

    async fn create_client(&self, config: &EndpointConfig) -> Result<Self::Client, TransportError> {
        (**self).create_client(config).await
    }

    async fn call_endpoint(
        &self,
        client: &Self::Client,
        operation: &str,
        payload: Value,
    ) -> Result<Value, TransportError> {
        (**self).call_endpoint(client, operation, payload).await
    }
}
