use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::GatewayError;
use crate::core::{Credentials, InvoiceAuthorizationRequest, InvoiceDetail, InvoiceHeader, InvoiceQuery};

/// Remote WSFEv1 operations invoked by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `FECompUltimoAutorizado`: last authorized voucher number.
    LastAuthorized,
    /// `FECAESolicitar`: request a CAE.
    RequestCae,
}

impl Operation {
    /// Operation name as declared in the WSDL.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LastAuthorized => "FECompUltimoAutorizado",
            Self::RequestCae => "FECAESolicitar",
        }
    }

    /// Field of the response body holding the result.
    pub fn result_field(&self) -> &'static str {
        match self {
            Self::LastAuthorized => "FECompUltimoAutorizadoResult",
            Self::RequestCae => "FECAESolicitarResult",
        }
    }
}

/// `{ Auth, PtoVta, CbteTipo }`
#[derive(Serialize)]
struct LastAuthorizedBody<'a> {
    #[serde(rename = "Auth")]
    auth: &'a Credentials,
    #[serde(flatten)]
    query: &'a InvoiceQuery,
}

/// `{ Auth, FeCAEReq: { FeCabReq, FeDetReq: { FECAEDetRequest } } }`
#[derive(Serialize)]
struct RequestCaeBody<'a> {
    #[serde(rename = "Auth")]
    auth: &'a Credentials,
    #[serde(rename = "FeCAEReq")]
    request: CaeRequest<'a>,
}

#[derive(Serialize)]
struct CaeRequest<'a> {
    #[serde(rename = "FeCabReq")]
    header: &'a InvoiceHeader,
    #[serde(rename = "FeDetReq")]
    details: DetailGroup<'a>,
}

#[derive(Serialize)]
struct DetailGroup<'a> {
    #[serde(rename = "FECAEDetRequest")]
    items: &'a [InvoiceDetail],
}

pub(crate) fn last_authorized_body(
    credentials: &Credentials,
    query: &InvoiceQuery,
) -> Result<Value, GatewayError> {
    encode(&LastAuthorizedBody {
        auth: credentials,
        query,
    })
}

pub(crate) fn request_cae_body(
    credentials: &Credentials,
    request: &InvoiceAuthorizationRequest,
) -> Result<Value, GatewayError> {
    encode(&RequestCaeBody {
        auth: credentials,
        request: CaeRequest {
            header: &request.header,
            details: DetailGroup {
                items: &request.details,
            },
        },
    })
}

fn encode<T: Serialize>(body: &T) -> Result<Value, GatewayError> {
    serde_json::to_value(body).map_err(|e| GatewayError::Payload(e.to_string()))
}

/// Take `<Operation>Result` out of a raw response body and decode it.
pub(crate) fn unwrap_result<T: DeserializeOwned>(
    operation: Operation,
    raw: Value,
) -> Result<T, GatewayError> {
    let unwrap_err = |reason: String| GatewayError::Unwrap {
        operation: operation.name(),
        field: operation.result_field(),
        reason,
    };

    let mut body = match raw {
        Value::Object(body) => body,
        other => {
            return Err(unwrap_err(format!(
                "response body is {}, not an object",
                kind(&other)
            )));
        }
    };
    let result = match body.remove(operation.result_field()) {
        None | Some(Value::Null) => return Err(unwrap_err("field missing".into())),
        Some(v) => v,
    };
    serde_json::from_value(result).map_err(|e| unwrap_err(e.to_string()))
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::core::{AuthorizationRequestBuilder, Concept, DetailBuilder, LastAuthorizedNumber};

    fn creds() -> Credentials {
        Credentials::new("TOKEN", "SIGN", 20_123_456_789)
    }

    #[test]
    fn last_authorized_shape() {
        let body = last_authorized_body(&creds(), &InvoiceQuery::new(2, 11)).unwrap();
        assert_eq!(
            body,
            json!({
                "Auth": {"Token": "TOKEN", "Sign": "SIGN", "Cuit": 20_123_456_789u64},
                "PtoVta": 2,
                "CbteTipo": 11
            })
        );
    }

    #[test]
    fn request_cae_shape() {
        let request = AuthorizationRequestBuilder::new(1, 6)
            .add_detail(
                DetailBuilder::new(
                    Concept::Products,
                    99,
                    0,
                    43,
                    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                )
                .net(dec!(100))
                .add_vat(5, dec!(100), dec!(21))
                .build()
                .unwrap(),
            )
            .build()
            .unwrap();
        let body = request_cae_body(&creds(), &request).unwrap();

        assert_eq!(body["Auth"]["Sign"], "SIGN");
        assert_eq!(
            body["FeCAEReq"]["FeCabReq"],
            json!({"CantReg": 1, "PtoVta": 1, "CbteTipo": 6})
        );
        let detail = &body["FeCAEReq"]["FeDetReq"]["FECAEDetRequest"][0];
        assert_eq!(detail["CbteDesde"], 43);
        assert_eq!(detail["ImpTotal"], "121");
        assert_eq!(detail["MonId"], "PES");
    }

    #[test]
    fn unwrap_takes_nested_field() {
        let raw = json!({"FECompUltimoAutorizadoResult": {"CbteNro": 42}});
        let last: LastAuthorizedNumber = unwrap_result(Operation::LastAuthorized, raw).unwrap();
        assert_eq!(last.number, Some(42));
    }

    #[test]
    fn unwrap_missing_field() {
        let err = unwrap_result::<LastAuthorizedNumber>(
            Operation::LastAuthorized,
            json!({"SomethingElse": {}}),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Unwrap { field: "FECompUltimoAutorizadoResult", .. }
        ));

        let err = unwrap_result::<LastAuthorizedNumber>(
            Operation::LastAuthorized,
            json!({"FECompUltimoAutorizadoResult": null}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("field missing"));
    }

    #[test]
    fn unwrap_non_object_body() {
        let err =
            unwrap_result::<LastAuthorizedNumber>(Operation::RequestCae, json!([1, 2])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "FECAESolicitar: cannot unwrap FECAESolicitarResult: response body is an array, not an object"
        );
    }

    #[test]
    fn unwrap_mismatched_shape() {
        let raw = json!({"FECompUltimoAutorizadoResult": {"CbteNro": "forty-two"}});
        let err = unwrap_result::<LastAuthorizedNumber>(Operation::LastAuthorized, raw).unwrap_err();
        assert!(matches!(err, GatewayError::Unwrap { .. }));
    }
}
