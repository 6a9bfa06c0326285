//! In-memory collaborators for unit tests.

use anyhow::anyhow;
use async_trait::async_trait;
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::invoice::NewInvoice;
use crate::models::User;
use crate::repository::{InvoiceRepository, UserRepository};
use crate::revalidate::Revalidator;
use crate::validation::InvoiceForm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceCall {
    Insert(NewInvoice),
    Update(Uuid, InvoiceForm),
    Delete(Uuid),
}

/// Records every statement and optionally fails all of them.
#[derive(Default)]
pub struct RecordingInvoiceRepository {
    pub calls: Mutex<Vec<InvoiceCall>>,
    pub fail: bool,
}

impl RecordingInvoiceRepository {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<InvoiceCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: InvoiceCall) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl InvoiceRepository for RecordingInvoiceRepository {
    async fn insert_invoice(&self, invoice: &NewInvoice) -> anyhow::Result<()> {
        self.record(InvoiceCall::Insert(invoice.clone()))
    }

    async fn update_invoice(&self, id: Uuid, form: &InvoiceForm) -> anyhow::Result<()> {
        self.record(InvoiceCall::Update(id, form.clone()))
    }

    async fn delete_invoice(&self, id: Uuid) -> anyhow::Result<()> {
        self.record(InvoiceCall::Delete(id))
    }
}

#[derive(Default)]
pub struct RecordingRevalidator {
    pub paths: Mutex<Vec<String>>,
}

impl RecordingRevalidator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl Revalidator for RecordingRevalidator {
    async fn revalidate_path(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

/// User store holding a fixed set of users.
#[derive(Default)]
pub struct FakeUserRepository {
    pub users: Vec<User>,
    pub fail: bool,
}

impl FakeUserRepository {
    /// Repository with a single user whose password is hashed at minimum cost.
    pub fn with_user(email: &str, password: &str) -> Self {
        let user = User {
            id: Uuid::new_v4(),
            name: "User".to_string(),
            email: email.to_string(),
            password: bcrypt::hash(password, 4).unwrap(),
        };
        Self {
            users: vec![user],
            fail: false,
        }
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        if self.fail {
            return Err(anyhow!("Failed to fetch user."));
        }
        Ok(self.users.iter().find(|u| u.email == email).cloned())
    }
}
