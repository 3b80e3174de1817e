//! Walks through an authorization against a canned transport.
//!
//! Run with: `RUST_LOG=wsfev1=debug cargo run --example authorize_invoice`

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use wsfev1::core::*;
use wsfev1::wsfe::*;

/// Stands in for a real SOAP client. Answers like the homologation server.
struct CannedTransport;

#[async_trait]
impl SoapTransport for CannedTransport {
    type Client = String;

    async fn create_client(&self, config: &EndpointConfig) -> Result<String, TransportError> {
        Ok(config.service_endpoint().to_string())
    }

    async fn call_endpoint(
        &self,
        _client: &String,
        operation: &str,
        payload: Value,
    ) -> Result<Value, TransportError> {
        match operation {
            "FECompUltimoAutorizado" => Ok(json!({
                "FECompUltimoAutorizadoResult": {
                    "PtoVta": payload["PtoVta"], "CbteTipo": payload["CbteTipo"], "CbteNro": 42
                }
            })),
            "FECAESolicitar" => {
                let detail = &payload["FeCAEReq"]["FeDetReq"]["FECAEDetRequest"][0];
                if detail["CbteDesde"] != json!(43) {
                    return Ok(json!({"FECAESolicitarResult": {
                        "FeCabResp": {"Resultado": "R"},
                        "Errors": {"Err": [{"Code": 10016, "Msg": "El numero de comprobante no es el proximo"}]}
                    }}));
                }
                Ok(json!({"FECAESolicitarResult": {
                    "FeCabResp": {"Resultado": "A", "CantReg": 1},
                    "FeDetResp": {"FECAEDetResponse": [{
                        "CbteDesde": 43, "CbteHasta": 43, "Resultado": "A",
                        "CAE": "74039876543210", "CAEFchVto": "20240125"
                    }]}
                }}))
            }
            other => Err(TransportError::msg(format!("unknown operation {other}"))),
        }
    }
}

/// One consumer-final product voucher at the 21% aliquot.
fn detail(number: u64) -> Result<InvoiceDetail, BuilderError> {
    const ALIQUOT_21: u32 = 5;

    let net = dec!(1000);
    let rate = codes::vat_rate(ALIQUOT_21).unwrap_or_default();
    let vat = (net * rate / dec!(100)).round_dp(2);
    assert!(codes::is_known_doc_type(codes::DOC_UNIDENTIFIED));

    DetailBuilder::new(
        Concept::Products,
        codes::DOC_UNIDENTIFIED,
        0,
        number,
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    )
    .net(net)
    .add_vat(ALIQUOT_21, net, vat)
    .build()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = EndpointConfig::resolve("development").expect("valid mode");
    println!("WSDL:     {}", config.wsdl_address());
    println!("Endpoint: {}\n", config.service_endpoint());

    let gateway = Wsfev1Gateway::new(config, CannedTransport);
    let creds = Credentials::new("token-from-wsaa", "sign-from-wsaa", 20_123_456_789);
    println!("Credentials: {creds:?}\n");

    // ── 1. Next voucher number ────────────────────────────────────────
    let invoice_type = codes::INVOICE_B;
    assert!(codes::is_known_invoice_type(invoice_type));
    println!(
        "Voucher type: {}",
        codes::invoice_type_name(invoice_type).unwrap_or("unknown")
    );
    let last = gateway
        .fetch_last_authorized_number(&creds, InvoiceQuery::new(1, invoice_type))
        .await
        .expect("last authorized");
    let next = last.next_number().unwrap_or(1);
    println!("Last authorized: {:?}, next: {next}", last.number);

    // ── 2. Authorize it ───────────────────────────────────────────────
    let request = AuthorizationRequestBuilder::new(1, invoice_type)
        .add_detail(detail(next).expect("valid detail"))
        .build()
        .expect("valid request");
    match gateway.request_authorization(&creds, &request).await {
        Ok(resp) => println!("Approved, CAE {}", resp.cae().unwrap_or("—")),
        Err(e) => println!("Failed: {e}"),
    }

    // ── 3. An out-of-sequence number is rejected remotely ────────────
    let request = AuthorizationRequestBuilder::new(1, invoice_type)
        .add_detail(detail(next + 5).expect("valid detail"))
        .build()
        .expect("valid request");
    match gateway.request_authorization(&creds, &request).await {
        Ok(resp) => println!("Approved, CAE {}", resp.cae().unwrap_or("—")),
        Err(e) => println!("Failed: {e}"),
    }
}
