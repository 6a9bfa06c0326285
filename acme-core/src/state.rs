use sqlx::PgPool;
use std::sync::Arc;

use crate::actions::InvoiceActions;
use crate::auth::Authenticator;
use crate::config::Config;
use crate::repository::{PgInvoiceRepository, PgUserRepository};
use crate::revalidate::ViewRevalidator;

/// Application state containing shared resources.
///
/// Holds the connection pool for the read queries and the collaborators
/// wired into the invoice actions and sign-in.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub db: PgPool,

    pub actions: InvoiceActions,

    pub auth: Authenticator,

    /// View generations, shared with `actions`
    pub views: Arc<ViewRevalidator>,
}

impl AppState {
    /// Wires the Postgres-backed collaborators around `db`.
    pub fn new(db: PgPool, config: &Config) -> Self {
        let views = Arc::new(ViewRevalidator::new());
        let actions = InvoiceActions::new(
            Arc::new(PgInvoiceRepository::new(db.clone())),
            views.clone(),
        );
        let auth = Authenticator::new(
            Arc::new(PgUserRepository::new(db.clone())),
            config.jwt_secret.clone(),
            config.session_ttl_seconds,
        );

        Self {
            db,
            actions,
            auth,
            views,
        }
    }
}
