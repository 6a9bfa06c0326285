//! Invoice mutations behind the dashboard forms.
//!
//! Create and update report every failure inline as an
//! `ActionOutcome::Failure`. Delete instead returns a `DeleteInvoiceError`
//! that the caller has to handle.

pub mod types;


use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::models::invoice::NewInvoice;
use crate::repository::InvoiceRepository;
use crate::revalidate::{invoice_edit_path, Revalidator, INVOICES_PATH};
use crate::validation::{validate_invoice_form, RawInvoiceForm};

pub use types::{ActionOutcome, DeleteInvoiceError, FormState};

pub const CREATE_MISSING_FIELDS: &str = "Missing fields. Failed to create invoice.";
pub const UPDATE_MISSING_FIELDS: &str = "Missing fields. Failed to update invoice.";
pub const CREATE_DATABASE_ERROR: &str = "Database error: Failed to create invoice.";
pub const UPDATE_DATABASE_ERROR: &str = "Database error: Failed to update invoice.";

/// Runs the invoice form actions against the injected collaborators.
#[derive(Clone)]
pub struct InvoiceActions {
    invoices: Arc<dyn InvoiceRepository>,
    revalidator: Arc<dyn Revalidator>,
}

impl InvoiceActions {
    pub fn new(invoices: Arc<dyn InvoiceRepository>, revalidator: Arc<dyn Revalidator>) -> Self {
        Self {
            invoices,
            revalidator,
        }
    }

    /// Validates the form and inserts a new invoice dated today.
    ///
    /// On success the invoice list is invalidated and the caller is sent
    /// back to it. A database failure keeps `prev_state` and replaces its
    /// message.
    pub async fn create_invoice(&self, prev_state: FormState, form: RawInvoiceForm) -> ActionOutcome {
        let form = match validate_invoice_form(&form) {
            Ok(form) => form,
            Err(errors) => {
                debug!("Create invoice rejected: {} invalid field(s)", errors.len());
                return ActionOutcome::Failure(FormState {
                    errors: Some(errors),
                    message: Some(CREATE_MISSING_FIELDS.to_string()),
                });
            }
        };

        let invoice = NewInvoice {
            id: Uuid::new_v4(),
            amount_in_cents: form.amount_in_cents(),
            customer_id: form.customer_id().to_string(),
            status: form.status(),
            date: Utc::now().date_naive(),
        };

        if let Err(e) = self.invoices.insert_invoice(&invoice).await {
            error!("Database error while creating invoice: {:#}", e);
            return ActionOutcome::Failure(FormState {
                message: Some(CREATE_DATABASE_ERROR.to_string()),
                ..prev_state
            });
        }

        info!("Created invoice {}", invoice.id);
        self.revalidator.revalidate_path(INVOICES_PATH).await;
        ActionOutcome::Redirect(INVOICES_PATH.to_string())
    }

    /// Validates the form and overwrites customer, amount and status of `id`.
    ///
    /// The invoice date is left untouched. On success both the list and the
    /// invoice's edit view are invalidated.
    pub async fn update_invoice(
        &self,
        id: Uuid,
        _prev_state: FormState,
        form: RawInvoiceForm,
    ) -> ActionOutcome {
        let form = match validate_invoice_form(&form) {
            Ok(form) => form,
            Err(errors) => {
                debug!("Update of invoice {} rejected: {} invalid field(s)", id, errors.len());
                return ActionOutcome::Failure(FormState {
                    errors: Some(errors),
                    message: Some(UPDATE_MISSING_FIELDS.to_string()),
                });
            }
        };

        if let Err(e) = self.invoices.update_invoice(id, &form).await {
            error!("Database error while updating invoice {}: {:#}", id, e);
            return ActionOutcome::Failure(FormState {
                errors: None,
                message: Some(UPDATE_DATABASE_ERROR.to_string()),
            });
        }

        info!("Updated invoice {}", id);
        self.revalidator.revalidate_path(INVOICES_PATH).await;
        self.revalidator.revalidate_path(&invoice_edit_path(id)).await;
        ActionOutcome::Redirect(INVOICES_PATH.to_string())
    }

    /// Deletes invoice `id` and invalidates the invoice list.
    ///
    /// Row existence is not checked. The caller stays on its current view.
    ///
    /// # Errors
    ///
    /// Returns `DeleteInvoiceError` when the statement fails.
    pub async fn delete_invoice(&self, id: Uuid) -> Result<(), DeleteInvoiceError> {
        if let Err(e) = self.invoices.delete_invoice(id).await {
            error!("Database error while deleting invoice {}: {:#}", id, e);
            return Err(DeleteInvoiceError { source: e });
        }

        info!("Deleted invoice {}", id);
        self.revalidator.revalidate_path(INVOICES_PATH).await;
        Ok(())
    }
}
