use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Path of the invoice list view.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Path of the edit view for a single invoice.
pub fn invoice_edit_path(id: Uuid) -> String {
    format!("{}/{}/edit", INVOICES_PATH, id)
}

/// Marks cached renders of a view stale.
#[async_trait]
pub trait Revalidator: Send + Sync {
    async fn revalidate_path(&self, path: &str);
}

/// Tracks a generation number per view path.
///
/// Every invalidation bumps the generation of its path. Read handlers
/// publish the current generation so a client holding an older render
/// knows it is stale.
#[derive(Debug, Default)]
pub struct ViewRevalidator {
    generations: RwLock<HashMap<String, u64>>,
}

impl ViewRevalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation of `path`; 0 if it was never invalidated.
    pub async fn generation(&self, path: &str) -> u64 {
        self.generations
            .read()
            .await
            .get(path)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl Revalidator for ViewRevalidator {
    async fn revalidate_path(&self, path: &str) {
        let mut generations = self.generations.write().await;
        let generation = generations.entry(path.to_string()).or_insert(0);
        *generation += 1;
        debug!("Revalidated {} (generation {})", path, generation);
    }
}
