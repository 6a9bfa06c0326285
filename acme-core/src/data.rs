//! Queries behind the dashboard views.
//!
//! Nothing here is cached: every view re-runs its queries on each request.

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::customer::CustomersTableRow;
use crate::models::invoice::{InvoiceEditView, InvoicesTableRow, LatestInvoice};
use crate::models::{Customer, Invoice, RevenuePoint};

/// Rows shown per page of the invoices table.
pub const ITEMS_PER_PAGE: i64 = 6;

/// Headline figures of the overview page. Totals are in cents.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CardData {
    pub number_of_customers: i64,
    pub number_of_invoices: i64,
    pub total_paid_invoices: i64,
    pub total_pending_invoices: i64,
}

pub async fn fetch_revenue(pool: &PgPool) -> Result<Vec<RevenuePoint>, sqlx::Error> {
    sqlx::query_as::<_, RevenuePoint>("SELECT month, revenue FROM revenue")
        .fetch_all(pool)
        .await
}

pub async fn fetch_latest_invoices(pool: &PgPool) -> Result<Vec<LatestInvoice>, sqlx::Error> {
    sqlx::query_as::<_, LatestInvoice>(
        r#"
        SELECT invoices.id, customers.name, customers.email, customers.image_url, invoices.amount
        FROM invoices
        JOIN customers ON invoices.customer_id = customers.id
        ORDER BY invoices.date DESC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_card_data(pool: &PgPool) -> Result<CardData, sqlx::Error> {
    sqlx::query_as::<_, CardData>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM customers) AS number_of_customers,
            (SELECT COUNT(*) FROM invoices) AS number_of_invoices,
            (SELECT COALESCE(SUM(amount), 0)::bigint FROM invoices WHERE status = 'paid')
                AS total_paid_invoices,
            (SELECT COALESCE(SUM(amount), 0)::bigint FROM invoices WHERE status = 'pending')
                AS total_pending_invoices
        "#,
    )
    .fetch_one(pool)
    .await
}

/// One page of invoices matching `query`, newest first.
///
/// `page` is 1-based; values below 1 are read as the first page.
pub async fn fetch_filtered_invoices(
    pool: &PgPool,
    query: &str,
    page: u32,
) -> Result<Vec<InvoicesTableRow>, sqlx::Error> {
    let offset = (i64::from(page.max(1)) - 1) * ITEMS_PER_PAGE;

    sqlx::query_as::<_, InvoicesTableRow>(
        r#"
        SELECT
            invoices.id, invoices.customer_id, customers.name, customers.email,
            customers.image_url, invoices.date, invoices.amount, invoices.status
        FROM invoices
        JOIN customers ON invoices.customer_id = customers.id
        WHERE
            customers.name ILIKE $1 OR
            customers.email ILIKE $1 OR
            invoices.amount::text ILIKE $1 OR
            invoices.date::text ILIKE $1 OR
            invoices.status ILIKE $1
        ORDER BY invoices.date DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(like_pattern(query))
    .bind(ITEMS_PER_PAGE)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Number of pages needed to list every invoice matching `query`.
pub async fn fetch_invoices_pages(pool: &PgPool, query: &str) -> Result<u32, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM invoices
        JOIN customers ON invoices.customer_id = customers.id
        WHERE
            customers.name ILIKE $1 OR
            customers.email ILIKE $1 OR
            invoices.amount::text ILIKE $1 OR
            invoices.date::text ILIKE $1 OR
            invoices.status ILIKE $1
        "#,
    )
    .bind(like_pattern(query))
    .fetch_one(pool)
    .await?;

    Ok(total_pages(count))
}

pub async fn fetch_invoice_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<InvoiceEditView>, sqlx::Error> {
    let invoice = sqlx::query_as::<_, Invoice>(
        "SELECT id, customer_id, amount, status, date FROM invoices WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(invoice.map(InvoiceEditView::from))
}

pub async fn fetch_customers(pool: &PgPool) -> Result<Vec<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>("SELECT id, name FROM customers ORDER BY name ASC")
        .fetch_all(pool)
        .await
}

pub async fn fetch_filtered_customers(
    pool: &PgPool,
    query: &str,
) -> Result<Vec<CustomersTableRow>, sqlx::Error> {
    sqlx::query_as::<_, CustomersTableRow>(
        r#"
        SELECT
            customers.id, customers.name, customers.email, customers.image_url,
            COUNT(invoices.id) AS total_invoices,
            COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0)::bigint
                AS total_pending,
            COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0)::bigint
                AS total_paid
        FROM customers
        LEFT JOIN invoices ON customers.id = invoices.customer_id
        WHERE customers.name ILIKE $1 OR customers.email ILIKE $1
        GROUP BY customers.id, customers.name, customers.email, customers.image_url
        ORDER BY customers.name ASC
        "#,
    )
    .bind(like_pattern(query))
    .fetch_all(pool)
    .await
}

fn like_pattern(query: &str) -> String {
    format!("%{}%", query)
}

fn total_pages(count: i64) -> u32 {
    let pages = (count.max(0) + ITEMS_PER_PAGE - 1) / ITEMS_PER_PAGE;
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(6), 1);
        assert_eq!(total_pages(7), 2);
        assert_eq!(total_pages(60), 10);
    }

    #[test]
    fn test_like_pattern_wraps_query() {
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("paid"), "%paid%");
    }

    /// Test helper to create a pool against `DATABASE_URL`.
    async fn create_test_pool() -> Result<PgPool, anyhow::Error> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL not set for tests"))?;

        let pool = PgPool::connect(&database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(pool)
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_created_invoice_is_listed() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        let customer_id = Uuid::new_v4();
        let name = format!("Customer {}", customer_id);

        sqlx::query("INSERT INTO customers (id, name, email, image_url) VALUES ($1, $2, $3, $4)")
            .bind(customer_id)
            .bind(&name)
            .bind("customer@example.com")
            .bind("/customers/placeholder.png")
            .execute(&pool)
            .await
            .expect("Should insert customer");

        sqlx::query(
            "INSERT INTO invoices (customer_id, amount, status, date) VALUES ($1, $2, $3, CURRENT_DATE)",
        )
        .bind(customer_id)
        .bind(150050_i64)
        .bind("pending")
        .execute(&pool)
        .await
        .expect("Should insert invoice");

        let rows = fetch_filtered_invoices(&pool, &name, 1)
            .await
            .expect("Query should succeed");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 150050);
        assert_eq!(fetch_invoices_pages(&pool, &name).await.unwrap(), 1);

        let customers = fetch_filtered_customers(&pool, &name)
            .await
            .expect("Query should succeed");
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].total_invoices, 1);
        assert_eq!(customers[0].total_pending, 150050);
        assert_eq!(customers[0].total_paid, 0);
    }
}
