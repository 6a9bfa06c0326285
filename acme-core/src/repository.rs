//! Persistence collaborators used by the invoice actions and sign-in.
//!
//! The traits are the seam between the pipelines and Postgres; the `Pg*`
//! types are the production implementations over the shared pool.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::models::invoice::NewInvoice;
use crate::models::User;
use crate::validation::InvoiceForm;

/// Write access to the `invoices` relation.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn insert_invoice(&self, invoice: &NewInvoice) -> anyhow::Result<()>;

    async fn update_invoice(&self, id: Uuid, form: &InvoiceForm) -> anyhow::Result<()>;

    /// Removes the row if present. A missing row is not an error.
    async fn delete_invoice(&self, id: Uuid) -> anyhow::Result<()>;
}

/// Read access to the `users` relation.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgInvoiceRepository {
    pool: PgPool,
}

impl PgInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for PgInvoiceRepository {
    async fn insert_invoice(&self, invoice: &NewInvoice) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO invoices (id, customer_id, amount, status, date)
            VALUES ($1, $2::uuid, $3, $4, $5)
            "#,
        )
        .bind(invoice.id)
        .bind(&invoice.customer_id)
        .bind(invoice.amount_in_cents)
        .bind(invoice.status)
        .bind(invoice.date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_invoice(&self, id: Uuid, form: &InvoiceForm) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $1::uuid, amount = $2, status = $3
            WHERE id = $4
            "#,
        )
        .bind(form.customer_id())
        .bind(form.amount_in_cents())
        .bind(form.status())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_invoice(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, name, email, password FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to fetch user: {}", e);
                e
            })
            .context("Failed to fetch user.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvoiceStatus;
    use crate::validation::{validate_invoice_form, RawInvoiceForm};

    /// Test helper to create a pool against `DATABASE_URL`.
    async fn create_test_pool() -> Result<PgPool, anyhow::Error> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL not set for tests"))?;

        let pool = PgPool::connect(&database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(pool)
    }

    async fn amount_of(pool: &PgPool, id: Uuid) -> Option<i64> {
        sqlx::query_scalar::<_, i64>("SELECT amount FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .expect("Query should succeed")
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_insert_update_delete_round() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        let repo = PgInvoiceRepository::new(pool.clone());
        let customer_id = Uuid::new_v4();
        let id = Uuid::new_v4();

        repo.insert_invoice(&NewInvoice {
            id,
            customer_id: customer_id.to_string(),
            amount_in_cents: 150050,
            status: InvoiceStatus::Pending,
            date: chrono::Utc::now().date_naive(),
        })
        .await
        .expect("Insert should succeed");
        assert_eq!(amount_of(&pool, id).await, Some(150050));

        let raw = RawInvoiceForm::new(Some(&customer_id.to_string()), Some("25.00"), Some("paid"));
        let form = validate_invoice_form(&raw).expect("form should validate");
        repo.update_invoice(id, &form).await.expect("Update should succeed");
        assert_eq!(amount_of(&pool, id).await, Some(2500));

        repo.delete_invoice(id).await.expect("Delete should succeed");
        assert_eq!(amount_of(&pool, id).await, None);

        // deleting a vanished row is not an error
        repo.delete_invoice(id).await.expect("Second delete should succeed");
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_malformed_customer_id_fails() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        let repo = PgInvoiceRepository::new(pool);

        let result = repo
            .insert_invoice(&NewInvoice {
                id: Uuid::new_v4(),
                customer_id: "not-a-uuid".to_string(),
                amount_in_cents: 100,
                status: InvoiceStatus::Paid,
                date: chrono::Utc::now().date_naive(),
            })
            .await;

        assert!(result.is_err());
    }
}
