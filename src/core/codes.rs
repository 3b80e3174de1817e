//! AFIP parameter tables used by WSFEv1 requests.
//!
//! These mirror the values published by the `FEParamGet*` operations of the
//! service. They are informational: the gateway never rejects a request
//! locally because a code is missing here, the remote service is the
//! authority.

use rust_decimal::Decimal;

/// Factura A.
pub const INVOICE_A: u32 = 1;
/// Nota de Crédito A.
pub const CREDIT_NOTE_A: u32 = 3;
/// Factura B.
pub const INVOICE_B: u32 = 6;
/// Nota de Crédito B.
pub const CREDIT_NOTE_B: u32 = 8;
/// Factura C.
pub const INVOICE_C: u32 = 11;
/// Nota de Crédito C.
pub const CREDIT_NOTE_C: u32 = 13;

/// Document type CUIT.
pub const DOC_CUIT: u32 = 80;
/// Document type DNI.
pub const DOC_DNI: u32 = 96;
/// Unidentified buyer (consumidor final).
pub const DOC_UNIDENTIFIED: u32 = 99;

/// Argentine peso, the `MonId` of domestic invoices.
pub const CURRENCY_PESOS: &str = "PES";
/// US dollar.
pub const CURRENCY_DOLLARS: &str = "DOL";

/// Check whether `code` is a known `CbteTipo`.
pub fn is_known_invoice_type(code: u32) -> bool {
    INVOICE_TYPES.binary_search_by_key(&code, |(c, _)| *c).is_ok()
}

/// Human-readable name of a `CbteTipo`.
pub fn invoice_type_name(code: u32) -> Option<&'static str> {
    INVOICE_TYPES
        .binary_search_by_key(&code, |(c, _)| *c)
        .ok()
        .map(|i| INVOICE_TYPES[i].1)
}

/// Check whether `code` is a known `DocTipo`.
pub fn is_known_doc_type(code: u32) -> bool {
    DOC_TYPES.binary_search(&code).is_ok()
}

/// VAT rate (percent) of an `AlicIva` id, e.g. `5` → 21.
pub fn vat_rate(id: u32) -> Option<Decimal> {
    VAT_RATES
        .binary_search_by_key(&id, |(i, _, _)| *i)
        .ok()
        .map(|i| Decimal::new(VAT_RATES[i].1, VAT_RATES[i].2))
}

/// Sorted by code for binary search.
static INVOICE_TYPES: &[(u32, &str)] = &[
    (1, "Factura A"),
    (2, "Nota de Débito A"),
    (3, "Nota de Crédito A"),
    (6, "Factura B"),
    (7, "Nota de Débito B"),
    (8, "Nota de Crédito B"),
    (11, "Factura C"),
    (12, "Nota de Débito C"),
    (13, "Nota de Crédito C"),
    (51, "Factura M"),
    (52, "Nota de Débito M"),
    (53, "Nota de Crédito M"),
    (201, "Factura de Crédito Electrónica MiPyMEs A"),
    (202, "Nota de Débito Electrónica MiPyMEs A"),
    (203, "Nota de Crédito Electrónica MiPyMEs A"),
    (206, "Factura de Crédito Electrónica MiPyMEs B"),
    (207, "Nota de Débito Electrónica MiPyMEs B"),
    (208, "Nota de Crédito Electrónica MiPyMEs B"),
    (211, "Factura de Crédito Electrónica MiPyMEs C"),
    (212, "Nota de Débito Electrónica MiPyMEs C"),
    (213, "Nota de Crédito Electrónica MiPyMEs C"),
];

static DOC_TYPES: &[u32] = &[
    80, // CUIT
    86, // CUIL
    87, // CDI
    89, // LE
    90, // LC
    91, // CI extranjera
    94, // Pasaporte
    96, // DNI
    99, // Sin identificar
];

/// `(id, mantissa, scale)` of each VAT aliquot.
static VAT_RATES: &[(u32, i64, u32)] = &[
    (3, 0, 0),    // 0%
    (4, 105, 1),  // 10.5%
    (5, 21, 0),   // 21%
    (6, 27, 0),   // 27%
    (8, 5, 0),    // 5%
    (9, 25, 1),   // 2.5%
];
