use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Invoice status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[sqlx(rename = "pending")]
    Pending,
    #[sqlx(rename = "paid")]
    Paid,
}

impl InvoiceStatus {
    /// Parses the exact form value; anything but `pending` or `paid` is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invoice model representing a row of the `invoices` table.
///
/// `amount` is stored in cents.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    /// Unique identifier for the invoice
    pub id: Uuid,

    /// Customer the invoice is billed to
    pub customer_id: Uuid,

    /// Amount in minor currency units
    pub amount: i64,

    /// Invoice status
    pub status: InvoiceStatus,

    /// Date the invoice was created
    pub date: NaiveDate,
}

/// Row written by the create action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub id: Uuid,
    pub customer_id: String,
    pub amount_in_cents: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Invoice row of the dashboard table, joined with its customer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoicesTableRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub date: NaiveDate,
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// One of the most recent invoices shown on the overview.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LatestInvoice {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: i64,
}

/// Invoice as loaded into the edit form, amount in whole units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceEditView {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: rust_decimal::Decimal,
    pub status: InvoiceStatus,
}

impl From<Invoice> for InvoiceEditView {
    fn from(invoice: Invoice) -> Self {
        InvoiceEditView {
            id: invoice.id,
            customer_id: invoice.customer_id,
            amount: rust_decimal::Decimal::new(invoice.amount, 2),
            status: invoice.status,
        }
    }
}
