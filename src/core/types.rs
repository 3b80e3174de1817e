use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::serde_util::{afip_date, afip_date_opt, afip_int, afip_int_opt, one_or_many};

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// WSAA credentials sent as the `Auth` element of every call.
///
/// The gateway never stores them. `Debug` redacts the token and signature
/// and masks the tax id, so credentials can sit inside logged structs.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    #[serde(rename = "Token")]
    token: String,
    #[serde(rename = "Sign")]
    sign: String,
    #[serde(rename = "Cuit")]
    cuit: u64,
}

impl Credentials {
    pub fn new(token: impl Into<String>, sign: impl Into<String>, cuit: u64) -> Self {
        Self {
            token: token.into(),
            sign: sign.into(),
            cuit,
        }
    }

    /// CUIT of the represented taxpayer.
    pub fn cuit(&self) -> u64 {
        self.cuit
    }

    /// CUIT with all but the last four digits hidden.
    pub fn masked_cuit(&self) -> String {
        mask_tax_id(&self.cuit.to_string())
    }
}

/// Hide all but the last four characters of a tax id.
pub fn mask_tax_id(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let hidden = chars.len().saturating_sub(4);
    let tail: String = chars[hidden..].iter().collect();
    format!("{}{tail}", "*".repeat(hidden))
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("sign", &"<redacted>")
            .field("cuit", &self.masked_cuit())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Counter to query: point of sale and voucher type, both assigned by AFIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceQuery {
    /// `PtoVta`
    #[serde(rename = "PtoVta")]
    pub point_of_sale: u32,
    /// `CbteTipo`
    #[serde(rename = "CbteTipo")]
    pub invoice_type: u32,
}

impl InvoiceQuery {
    pub fn new(point_of_sale: u32, invoice_type: u32) -> Self {
        Self {
            point_of_sale,
            invoice_type,
        }
    }
}

/// `Concepto`: what the voucher bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Concept {
    Products = 1,
    Services = 2,
    ProductsAndServices = 3,
}

impl Concept {
    /// Services require the service period and payment due date.
    pub fn includes_services(&self) -> bool {
        !matches!(self, Self::Products)
    }
}

impl From<Concept> for u8 {
    fn from(c: Concept) -> u8 {
        c as u8
    }
}

impl TryFrom<u8> for Concept {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Products),
            2 => Ok(Self::Services),
            3 => Ok(Self::ProductsAndServices),
            _ => Err(format!("unknown Concepto {code}")),
        }
    }
}

impl std::str::FromStr for Concept {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code: u8 = s.parse().map_err(|_| format!("unknown Concepto {s:?}"))?;
        Self::try_from(code)
    }
}

/// `FeCabReq`: request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// `CantReg`: number of details in the request.
    #[serde(rename = "CantReg")]
    pub count: u32,
    /// `PtoVta`
    #[serde(rename = "PtoVta")]
    pub point_of_sale: u32,
    /// `CbteTipo`
    #[serde(rename = "CbteTipo")]
    pub invoice_type: u32,
}

/// `FECAEDetRequest`: one voucher (or range of vouchers) to authorize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    /// `Concepto`
    #[serde(rename = "Concepto")]
    pub concept: Concept,
    /// `DocTipo`: buyer document type, e.g. 80 (CUIT) or 99 (unidentified).
    #[serde(rename = "DocTipo")]
    pub doc_type: u32,
    /// `DocNro`: buyer document number, 0 when unidentified.
    #[serde(rename = "DocNro")]
    pub doc_number: u64,
    /// `CbteDesde`
    #[serde(rename = "CbteDesde")]
    pub number_from: u64,
    /// `CbteHasta`
    #[serde(rename = "CbteHasta")]
    pub number_to: u64,
    /// `CbteFch`: voucher date.
    #[serde(rename = "CbteFch", with = "afip_date")]
    pub date: NaiveDate,
    /// `ImpTotal`: grand total.
    #[serde(rename = "ImpTotal")]
    pub total: Decimal,
    /// `ImpTotConc`: amount not subject to VAT.
    #[serde(rename = "ImpTotConc")]
    pub untaxed: Decimal,
    /// `ImpNeto`: net taxed amount.
    #[serde(rename = "ImpNeto")]
    pub net: Decimal,
    /// `ImpOpEx`: VAT-exempt amount.
    #[serde(rename = "ImpOpEx")]
    pub exempt: Decimal,
    /// `ImpTrib`: sum of other taxes.
    #[serde(rename = "ImpTrib")]
    pub other_taxes: Decimal,
    /// `ImpIVA`: sum of VAT.
    #[serde(rename = "ImpIVA")]
    pub vat: Decimal,
    /// `FchServDesde`
    #[serde(
        rename = "FchServDesde",
        default,
        with = "afip_date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_from: Option<NaiveDate>,
    /// `FchServHasta`
    #[serde(
        rename = "FchServHasta",
        default,
        with = "afip_date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_to: Option<NaiveDate>,
    /// `FchVtoPago`
    #[serde(
        rename = "FchVtoPago",
        default,
        with = "afip_date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_due: Option<NaiveDate>,
    /// `MonId`: AFIP currency code, "PES" for pesos.
    #[serde(rename = "MonId")]
    pub currency: String,
    /// `MonCotiz`: exchange rate to pesos.
    #[serde(rename = "MonCotiz")]
    pub exchange_rate: Decimal,
    /// `CbtesAsoc`: vouchers a credit or debit note refers to.
    #[serde(rename = "CbtesAsoc", default, skip_serializing_if = "Option::is_none")]
    pub associated: Option<AssociatedVouchers>,
    /// `Tributos`
    #[serde(rename = "Tributos", default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<OtherTaxes>,
    /// `Iva`
    #[serde(rename = "Iva", default, skip_serializing_if = "Option::is_none")]
    pub vat_rates: Option<VatRates>,
}

/// `AlicIva`: VAT subtotal for one aliquot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatRate {
    /// `Id`: aliquot id, see [`crate::core::codes::vat_rate`].
    #[serde(rename = "Id")]
    pub id: u32,
    /// `BaseImp`
    #[serde(rename = "BaseImp")]
    pub base: Decimal,
    /// `Importe`
    #[serde(rename = "Importe")]
    pub amount: Decimal,
}

/// `Tributo`: a tax other than VAT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherTax {
    #[serde(rename = "Id")]
    pub id: u32,
    #[serde(rename = "Desc", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "BaseImp")]
    pub base: Decimal,
    #[serde(rename = "Alic")]
    pub rate: Decimal,
    #[serde(rename = "Importe")]
    pub amount: Decimal,
}

/// `CbteAsoc`: reference to a previously authorized voucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociatedVoucher {
    #[serde(rename = "Tipo")]
    pub invoice_type: u32,
    #[serde(rename = "PtoVta")]
    pub point_of_sale: u32,
    #[serde(rename = "Nro")]
    pub number: u64,
    #[serde(rename = "Cuit", default, skip_serializing_if = "Option::is_none")]
    pub cuit: Option<u64>,
    #[serde(
        rename = "CbteFch",
        default,
        with = "afip_date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
}

/// `Iva` wrapper element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VatRates {
    #[serde(rename = "AlicIva", default, deserialize_with = "one_or_many::deserialize")]
    pub items: Vec<VatRate>,
}

/// `Tributos` wrapper element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherTaxes {
    #[serde(rename = "Tributo", default, deserialize_with = "one_or_many::deserialize")]
    pub items: Vec<OtherTax>,
}

/// `CbtesAsoc` wrapper element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssociatedVouchers {
    #[serde(rename = "CbteAsoc", default, deserialize_with = "one_or_many::deserialize")]
    pub items: Vec<AssociatedVoucher>,
}

/// Payload of an authorization request: header plus voucher details.
///
/// Nothing here is checked against AFIP's rules; the remote service does
/// that. Use [`crate::core::AuthorizationRequestBuilder`] to keep `CantReg`
/// consistent with the details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceAuthorizationRequest {
    pub header: InvoiceHeader,
    pub details: Vec<InvoiceDetail>,
}

impl InvoiceAuthorizationRequest {
    pub fn new(header: InvoiceHeader, details: Vec<InvoiceDetail>) -> Self {
        Self { header, details }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// `Err` / `Evt` / `Obs`: a coded message from the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(rename = "Code", deserialize_with = "afip_int::deserialize")]
    pub code: i32,
    #[serde(rename = "Msg")]
    pub message: String,
}

impl ApiMessage {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.message)
    }
}

/// Render messages as `"<code> - <msg>, <code> - <msg>"`, in order.
pub fn join_messages(messages: &[ApiMessage]) -> String {
    messages
        .iter()
        .map(ApiMessage::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Errors` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorList {
    #[serde(rename = "Err", default, deserialize_with = "one_or_many::deserialize")]
    pub items: Vec<ApiMessage>,
}

/// `Events` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventList {
    #[serde(rename = "Evt", default, deserialize_with = "one_or_many::deserialize")]
    pub items: Vec<ApiMessage>,
}

/// `Observaciones` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationList {
    #[serde(rename = "Obs", default, deserialize_with = "one_or_many::deserialize")]
    pub items: Vec<ApiMessage>,
}

/// `Resultado`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "A")]
    Approved,
    #[serde(rename = "R")]
    Rejected,
    #[serde(rename = "P")]
    Partial,
}

/// `FeCabResp`: response header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    #[serde(
        rename = "Cuit",
        default,
        deserialize_with = "afip_int_opt::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub cuit: Option<u64>,
    #[serde(
        rename = "PtoVta",
        default,
        deserialize_with = "afip_int_opt::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub point_of_sale: Option<u32>,
    #[serde(
        rename = "CbteTipo",
        default,
        deserialize_with = "afip_int_opt::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub invoice_type: Option<u32>,
    /// `FchProceso`: `yyyymmddhhmmss`, kept verbatim.
    #[serde(rename = "FchProceso", default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<String>,
    #[serde(
        rename = "CantReg",
        default,
        deserialize_with = "afip_int_opt::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<u32>,
    #[serde(rename = "Resultado", default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(rename = "Reproceso", default, skip_serializing_if = "Option::is_none")]
    pub reprocessed: Option<String>,
}

/// `FECAEDetResponse`: authorization result of one detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailResult {
    #[serde(
        rename = "Concepto",
        default,
        deserialize_with = "afip_int_opt::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub concept: Option<Concept>,
    #[serde(
        rename = "DocTipo",
        default,
        deserialize_with = "afip_int_opt::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub doc_type: Option<u32>,
    #[serde(
        rename = "DocNro",
        default,
        deserialize_with = "afip_int_opt::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub doc_number: Option<u64>,
    #[serde(
        rename = "CbteDesde",
        default,
        deserialize_with = "afip_int_opt::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub number_from: Option<u64>,
    #[serde(
        rename = "CbteHasta",
        default,
        deserialize_with = "afip_int_opt::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub number_to: Option<u64>,
    #[serde(
        rename = "CbteFch",
        default,
        with = "afip_date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(rename = "Resultado", default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(rename = "Observaciones", default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<ObservationList>,
    /// `CAE`: the authorization code.
    #[serde(rename = "CAE", default, skip_serializing_if = "Option::is_none")]
    pub cae: Option<String>,
    /// `CAEFchVto`: expiry of the authorization code.
    #[serde(
        rename = "CAEFchVto",
        default,
        with = "afip_date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub cae_due: Option<NaiveDate>,
}

impl DetailResult {
    pub fn observations(&self) -> &[ApiMessage] {
        self.observations.as_ref().map(|o| o.items.as_slice()).unwrap_or_default()
    }
}

/// `FeDetResp` wrapper element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailResults {
    #[serde(
        rename = "FECAEDetResponse",
        default,
        deserialize_with = "one_or_many::deserialize"
    )]
    pub items: Vec<DetailResult>,
}

/// `FECAEResponse`: unwrapped result of `FECAESolicitar`.
///
/// A non-empty `Errors` list means the authorization failed, whatever the
/// other fields say.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceAuthorizationResponse {
    #[serde(rename = "FeCabResp", default, skip_serializing_if = "Option::is_none")]
    pub header: Option<ResponseHeader>,
    #[serde(rename = "FeDetResp", default, skip_serializing_if = "Option::is_none")]
    pub details: Option<DetailResults>,
    #[serde(rename = "Events", default, skip_serializing_if = "Option::is_none")]
    pub events: Option<EventList>,
    #[serde(rename = "Errors", default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorList>,
}

impl InvoiceAuthorizationResponse {
    pub fn errors(&self) -> &[ApiMessage] {
        self.errors.as_ref().map(|e| e.items.as_slice()).unwrap_or_default()
    }

    pub fn events(&self) -> &[ApiMessage] {
        self.events.as_ref().map(|e| e.items.as_slice()).unwrap_or_default()
    }

    pub fn details(&self) -> &[DetailResult] {
        self.details.as_ref().map(|d| d.items.as_slice()).unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    /// `Resultado` of the header.
    pub fn outcome(&self) -> Option<Outcome> {
        self.header.as_ref().and_then(|h| h.outcome)
    }

    /// CAE of the first detail, the common single-voucher case.
    pub fn cae(&self) -> Option<&str> {
        self.details().first().and_then(|d| d.cae.as_deref())
    }
}

/// `FERecuperaLastCbteResponse`: unwrapped result of `FECompUltimoAutorizado`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAuthorizedNumber {
    #[serde(
        rename = "PtoVta",
        default,
        deserialize_with = "afip_int_opt::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub point_of_sale: Option<u32>,
    #[serde(
        rename = "CbteTipo",
        default,
        deserialize_with = "afip_int_opt::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub invoice_type: Option<u32>,
    /// `CbteNro`: last authorized voucher number, 0 if none yet.
    #[serde(
        rename = "CbteNro",
        default,
        deserialize_with = "afip_int_opt::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<u64>,
    #[serde(rename = "Errors", default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorList>,
    #[serde(rename = "Events", default, skip_serializing_if = "Option::is_none")]
    pub events: Option<EventList>,
}

impl LastAuthorizedNumber {
    /// Number to use for the next voucher of this counter.
    pub fn next_number(&self) -> Option<u64> {
        self.number.map(|n| n + 1)
    }
}
