use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use super::envelope::{self, Operation};
use super::error::GatewayError;
use super::transport::SoapTransport;
use crate::core::{
    Credentials, EndpointConfig, InvoiceAuthorizationRequest, InvoiceAuthorizationResponse,
    InvoiceQuery, LastAuthorizedNumber, mask_tax_id,
};

/// Gateway to the WSFEv1 service.
///
/// Holds the resolved endpoint configuration and the transport, nothing
/// else. Every call builds a fresh client; there is no caching and no
/// retrying. Share it behind an `Arc` for concurrent callers.
pub struct Wsfev1Gateway<T> {
    config: EndpointConfig,
    transport: T,
}

impl<T: SoapTransport> Wsfev1Gateway<T> {
    pub fn new(config: EndpointConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Last voucher number AFIP has authorized for a point of sale and
    /// voucher type.
    ///
    /// The result is returned as reported; embedded `Errors` are not
    /// inspected.
    ///
    /// # Errors
    ///
    /// Transport failures are passed through. `GatewayError::Unwrap` if the
    /// response lacks `FECompUltimoAutorizadoResult`.
    #[instrument(
        skip_all,
        fields(cuit = %credentials.masked_cuit(), pto_vta = query.point_of_sale, cbte_tipo = query.invoice_type)
    )]
    pub async fn fetch_last_authorized_number(
        &self,
        credentials: &Credentials,
        query: InvoiceQuery,
    ) -> Result<LastAuthorizedNumber, GatewayError> {
        let operation = Operation::LastAuthorized;
        let payload = envelope::last_authorized_body(credentials, &query)?;
        let raw = self.invoke(operation, payload).await?;
        let result: LastAuthorizedNumber = envelope::unwrap_result(operation, raw)
            .inspect_err(|e| error!(operation = operation.name(), error = %e, "unwrap failed"))?;

        debug!(cbte_nro = ?result.number, "last authorized voucher");
        Ok(result)
    }

    /// Request a CAE for the vouchers in `request`.
    ///
    /// # Errors
    ///
    /// Transport failures are passed through. `GatewayError::Unwrap` if the
    /// response lacks `FECAESolicitarResult`. `GatewayError::RemoteApplication`
    /// if the response carries a non-empty `Errors` list, even when the
    /// transport call itself succeeded.
    #[instrument(
        skip_all,
        fields(
            cuit = %credentials.masked_cuit(),
            pto_vta = request.header.point_of_sale,
            cbte_tipo = request.header.invoice_type,
            cant_reg = request.header.count,
        )
    )]
    pub async fn request_authorization(
        &self,
        credentials: &Credentials,
        request: &InvoiceAuthorizationRequest,
    ) -> Result<InvoiceAuthorizationResponse, GatewayError> {
        let operation = Operation::RequestCae;
        let payload = envelope::request_cae_body(credentials, request)?;
        debug!(payload = %redacted(&payload), "authorization request");

        let raw = self.invoke(operation, payload).await?;
        debug!(response = %redacted(&raw), "authorization raw response");

        let response: InvoiceAuthorizationResponse = envelope::unwrap_result(operation, raw)
            .inspect_err(|e| error!(operation = operation.name(), error = %e, "unwrap failed"))?;

        if response.has_errors() {
            let err = GatewayError::RemoteApplication {
                errors: response.errors().to_vec(),
            };
            error!(errors = %err, "authorization rejected");
            return Err(err);
        }

        for evt in response.events() {
            warn!(code = evt.code, msg = %evt.message, "service event");
        }
        for detail in response.details() {
            for obs in detail.observations() {
                warn!(
                    cbte_desde = ?detail.number_from,
                    code = obs.code,
                    msg = %obs.message,
                    "detail observation"
                );
            }
        }
        debug!(outcome = ?response.outcome(), cae = ?response.cae(), "authorization response");
        Ok(response)
    }

    /// Declared by the service surface but not supported.
    pub async fn retrieve_last_voucher(&self) -> Result<(), GatewayError> {
        Err(GatewayError::Unsupported("retrieve_last_voucher"))
    }

    /// WSAA ticket acquisition. Not supported: credentials are supplied by
    /// the caller on every call.
    pub async fn open_ticket(&self) -> Result<(), GatewayError> {
        Err(GatewayError::Unsupported("open_ticket"))
    }

    /// Acquire a client, then invoke `operation`. Both steps run in order;
    /// a failure in either is returned as is.
    async fn invoke(&self, operation: Operation, payload: Value) -> Result<Value, GatewayError> {
        let client = self
            .transport
            .create_client(&self.config)
            .await
            .inspect_err(|e| {
                error!(
                    operation = operation.name(),
                    wsdl = %self.config.wsdl_address(),
                    error = %e,
                    "client creation failed"
                )
            })?;

        debug!(
            operation = operation.name(),
            endpoint = self.config.service_endpoint(),
            "calling service"
        );
        let raw = self
            .transport
            .call_endpoint(&client, operation.name(), payload)
            .await
            .inspect_err(|e| error!(operation = operation.name(), error = %e, "call failed"))?;
        Ok(raw)
    }
}

/// Copy of a payload fit for logs: `Token` and `Sign` blanked, every
/// `Cuit` masked.
fn redacted(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = match k.as_str() {
                        "Token" | "Sign" => Value::from("<redacted>"),
                        "Cuit" => Value::from(mask_tax_id(&scalar_text(v))),
                        _ => redacted(v),
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redacted).collect()),
        other => other.clone(),
    }
}

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
