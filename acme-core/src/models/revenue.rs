use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Monthly revenue figure used by the overview chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RevenuePoint {
    pub month: String,
    pub revenue: i64,
}

impl RevenuePoint {
    pub fn new(month: impl Into<String>, revenue: i64) -> Self {
        Self {
            month: month.into(),
            revenue,
        }
    }
}
