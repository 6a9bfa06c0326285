use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::FieldErrors;

/// State carried between submissions of an invoice form.
///
/// Holds the field errors and banner message shown when the form is
/// rendered again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormState {
    pub fn has_field_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }
}

/// Result of a create or update submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action succeeded; the caller must navigate to this path.
    Redirect(String),

    /// The action failed; the form is shown again with this state.
    Failure(FormState),
}

/// Raised when an invoice could not be deleted.
#[derive(Error, Debug)]
#[error("Failed to delete invoice.")]
pub struct DeleteInvoiceError {
    #[source]
    pub source: anyhow::Error,
}
