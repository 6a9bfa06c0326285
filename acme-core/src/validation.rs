//! Invoice form validation.
//!
//! Raw form values arrive as optional strings. Each field has its own
//! validator that coerces the value and either yields the typed field or a
//! message; `FieldCollector` runs them independently so that every invalid
//! field is reported in one pass.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::models::InvoiceStatus;

/// Field name to list of human-readable messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const CUSTOMER_FIELD: &str = "customerId";
pub const AMOUNT_FIELD: &str = "amount";
pub const STATUS_FIELD: &str = "status";

pub const CUSTOMER_REQUIRED: &str = "Selecting a customer is required.";
pub const AMOUNT_REQUIRED: &str = "Amount is required and must be greater than zero.";
pub const AMOUNT_NOT_A_NUMBER: &str = "Expected number, received nan.";
pub const AMOUNT_TOO_LARGE: &str = "Amount is too large.";
pub const STATUS_INVALID: &str = "Status must be either 'pending' or 'paid'.";

/// Untrusted invoice form as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInvoiceForm {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

impl RawInvoiceForm {
    pub fn new(customer_id: Option<&str>, amount: Option<&str>, status: Option<&str>) -> Self {
        Self {
            customer_id: customer_id.map(str::to_string),
            amount: amount.map(str::to_string),
            status: status.map(str::to_string),
        }
    }
}

/// Normalized invoice fields, produced only by `validate_invoice_form`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceForm {
    customer_id: String,
    /// Amount in whole currency units
    amount: Decimal,
    #[serde(skip)]
    amount_in_cents: i64,
    status: InvoiceStatus,
}

impl InvoiceForm {
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Amount converted to cents.
    pub fn amount_in_cents(&self) -> i64 {
        self.amount_in_cents
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }
}

/// Validates and normalizes a submitted invoice form.
///
/// Returns the typed form, or every field error found. Never both.
pub fn validate_invoice_form(raw: &RawInvoiceForm) -> Result<InvoiceForm, FieldErrors> {
    let mut fields = FieldCollector::default();

    let customer_id = fields.check(CUSTOMER_FIELD, customer_id(raw.customer_id.as_deref()));
    let amount = fields.check(AMOUNT_FIELD, amount(raw.amount.as_deref()));
    let cents = amount.and_then(to_minor_units);
    let status = fields.check(STATUS_FIELD, status(raw.status.as_deref()));

    match (customer_id, amount, cents, status) {
        (Some(customer_id), Some(amount), Some(amount_in_cents), Some(status)) => Ok(InvoiceForm {
            customer_id,
            amount,
            amount_in_cents,
            status,
        }),
        _ => Err(fields.into_errors()),
    }
}

/// Converts a whole-unit amount to cents, rounding half away from zero.
///
/// Returns `None` when the result does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

#[derive(Default)]
struct FieldCollector {
    errors: FieldErrors,
}

impl FieldCollector {
    fn check<T>(&mut self, field: &str, result: Result<T, &'static str>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors
                    .entry(field.to_string())
                    .or_default()
                    .push(message.to_string());
                None
            }
        }
    }

    fn into_errors(self) -> FieldErrors {
        self.errors
    }
}

fn customer_id(raw: Option<&str>) -> Result<String, &'static str> {
    let value = raw.unwrap_or_default();
    if value.is_empty() {
        return Err(CUSTOMER_REQUIRED);
    }
    Ok(value.to_string())
}

fn amount(raw: Option<&str>) -> Result<Decimal, &'static str> {
    let trimmed = raw.unwrap_or_default().trim();
    let value = if trimmed.is_empty() {
        Decimal::ZERO
    } else {
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| AMOUNT_NOT_A_NUMBER)?
    };

    if value <= Decimal::ZERO {
        return Err(AMOUNT_REQUIRED);
    }
    if to_minor_units(value).is_none() {
        return Err(AMOUNT_TOO_LARGE);
    }
    Ok(value)
}

fn status(raw: Option<&str>) -> Result<InvoiceStatus, &'static str> {
    raw.and_then(InvoiceStatus::parse).ok_or(STATUS_INVALID)
}
