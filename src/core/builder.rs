use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::codes::CURRENCY_PESOS;
use super::error::BuilderError;
use super::types::*;

/// Builder for an authorization request.
///
/// `CantReg` is derived from the number of details added.
///
/// ```
/// use wsfev1::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let request = AuthorizationRequestBuilder::new(1, codes::INVOICE_B)
///     .add_detail(
///         DetailBuilder::new(Concept::Products, codes::DOC_UNIDENTIFIED, 0, 43,
///                            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
///             .net(dec!(100))
///             .add_vat(5, dec!(100), dec!(21))
///             .build()
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(request.header.count, 1);
/// assert_eq!(request.details[0].total, dec!(121));
/// ```
pub struct AuthorizationRequestBuilder {
    point_of_sale: u32,
    invoice_type: u32,
    details: Vec<InvoiceDetail>,
}

impl AuthorizationRequestBuilder {
    pub fn new(point_of_sale: u32, invoice_type: u32) -> Self {
        Self {
            point_of_sale,
            invoice_type,
            details: Vec::new(),
        }
    }

    pub fn add_detail(mut self, detail: InvoiceDetail) -> Self {
        self.details.push(detail);
        self
    }

    /// Build the request.
    ///
    /// Fails if no detail was added or a detail has an inverted number
    /// range. Everything else is left to the remote service.
    pub fn build(self) -> Result<InvoiceAuthorizationRequest, BuilderError> {
        if self.details.is_empty() {
            return Err(BuilderError::NoDetails);
        }
        if let Some(d) = self.details.iter().find(|d| d.number_from > d.number_to) {
            return Err(BuilderError::InvertedRange {
                from: d.number_from,
                to: d.number_to,
            });
        }

        let header = InvoiceHeader {
            count: u32::try_from(self.details.len()).unwrap_or(u32::MAX),
            point_of_sale: self.point_of_sale,
            invoice_type: self.invoice_type,
        };
        Ok(InvoiceAuthorizationRequest::new(header, self.details))
    }
}

/// Builder for a single `FECAEDetRequest`.
///
/// Amounts default to zero and the currency to pesos at rate 1. Unless
/// set explicitly, `ImpIVA` is the sum of the VAT subtotals, `ImpTrib` the
/// sum of the other taxes, and `ImpTotal` the sum of all components.
pub struct DetailBuilder {
    concept: Concept,
    doc_type: u32,
    doc_number: u64,
    number_from: u64,
    number_to: u64,
    date: NaiveDate,
    total: Option<Decimal>,
    untaxed: Decimal,
    net: Decimal,
    exempt: Decimal,
    other_taxes: Option<Decimal>,
    vat: Option<Decimal>,
    service_from: Option<NaiveDate>,
    service_to: Option<NaiveDate>,
    payment_due: Option<NaiveDate>,
    currency: String,
    exchange_rate: Decimal,
    associated: Vec<AssociatedVoucher>,
    taxes: Vec<OtherTax>,
    vat_rates: Vec<VatRate>,
}

impl DetailBuilder {
    /// A single voucher `number` dated `date`.
    pub fn new(concept: Concept, doc_type: u32, doc_number: u64, number: u64, date: NaiveDate) -> Self {
        Self {
            concept,
            doc_type,
            doc_number,
            number_from: number,
            number_to: number,
            date,
            total: None,
            untaxed: Decimal::ZERO,
            net: Decimal::ZERO,
            exempt: Decimal::ZERO,
            other_taxes: None,
            vat: None,
            service_from: None,
            service_to: None,
            payment_due: None,
            currency: CURRENCY_PESOS.to_string(),
            exchange_rate: Decimal::ONE,
            associated: Vec::new(),
            taxes: Vec::new(),
            vat_rates: Vec::new(),
        }
    }

    /// Authorize a batch of consecutive vouchers (type B and C only).
    pub fn range(mut self, from: u64, to: u64) -> Self {
        self.number_from = from;
        self.number_to = to;
        self
    }

    pub fn total(mut self, amount: Decimal) -> Self {
        self.total = Some(amount);
        self
    }

    pub fn untaxed(mut self, amount: Decimal) -> Self {
        self.untaxed = amount;
        self
    }

    pub fn net(mut self, amount: Decimal) -> Self {
        self.net = amount;
        self
    }

    pub fn exempt(mut self, amount: Decimal) -> Self {
        self.exempt = amount;
        self
    }

    pub fn other_taxes(mut self, amount: Decimal) -> Self {
        self.other_taxes = Some(amount);
        self
    }

    pub fn vat(mut self, amount: Decimal) -> Self {
        self.vat = Some(amount);
        self
    }

    pub fn service_period(mut self, from: NaiveDate, to: NaiveDate, payment_due: NaiveDate) -> Self {
        self.service_from = Some(from);
        self.service_to = Some(to);
        self.payment_due = Some(payment_due);
        self
    }

    pub fn currency(mut self, code: impl Into<String>, exchange_rate: Decimal) -> Self {
        self.currency = code.into();
        self.exchange_rate = exchange_rate;
        self
    }

    pub fn add_vat(mut self, id: u32, base: Decimal, amount: Decimal) -> Self {
        self.vat_rates.push(VatRate { id, base, amount });
        self
    }

    pub fn add_tax(mut self, tax: OtherTax) -> Self {
        self.taxes.push(tax);
        self
    }

    pub fn add_associated(mut self, voucher: AssociatedVoucher) -> Self {
        self.associated.push(voucher);
        self
    }

    /// Build the detail, deriving the unset totals.
    ///
    /// Fails with [`BuilderError::AmountOverflow`] if a derived sum leaves
    /// the decimal range.
    pub fn build(self) -> Result<InvoiceDetail, BuilderError> {
        let vat = match self.vat {
            Some(amount) => amount,
            None => checked_sum(self.vat_rates.iter().map(|r| r.amount), "ImpIVA")?,
        };
        let other_taxes = match self.other_taxes {
            Some(amount) => amount,
            None => checked_sum(self.taxes.iter().map(|t| t.amount), "ImpTrib")?,
        };
        let total = match self.total {
            Some(amount) => amount,
            None => checked_sum(
                [self.untaxed, self.net, self.exempt, other_taxes, vat],
                "ImpTotal",
            )?,
        };

        Ok(InvoiceDetail {
            concept: self.concept,
            doc_type: self.doc_type,
            doc_number: self.doc_number,
            number_from: self.number_from,
            number_to: self.number_to,
            date: self.date,
            total,
            untaxed: self.untaxed,
            net: self.net,
            exempt: self.exempt,
            other_taxes,
            vat,
            service_from: self.service_from,
            service_to: self.service_to,
            payment_due: self.payment_due,
            currency: self.currency,
            exchange_rate: self.exchange_rate,
            associated: non_empty(self.associated).map(|items| AssociatedVouchers { items }),
            taxes: non_empty(self.taxes).map(|items| OtherTaxes { items }),
            vat_rates: non_empty(self.vat_rates).map(|items| VatRates { items }),
        })
    }
}

fn checked_sum(
    amounts: impl IntoIterator<Item = Decimal>,
    field: &'static str,
) -> Result<Decimal, BuilderError> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(a))
        .ok_or(BuilderError::AmountOverflow(field))
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}
