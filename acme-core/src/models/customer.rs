use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Customer option for the invoice form's select.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
}

/// Row of the customers table with aggregated invoice figures.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomersTableRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    /// Sum of pending invoices, in cents
    pub total_pending: i64,
    /// Sum of paid invoices, in cents
    pub total_paid: i64,
}
