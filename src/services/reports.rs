use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::models::inventory::{InventoryEntry, InventoryLevel};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DashboardStats {
    pub total_donations: i64,
    pub total_requests: i64,
    pub blood_types_available: i64,
    pub total_blood_units: Decimal,
}

impl DashboardStats {
    pub async fn fetch(pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM blood_donations) AS total_donations,
                (SELECT COUNT(*) FROM blood_requests) AS total_requests,
                (SELECT COUNT(DISTINCT blood_type) FROM blood_inventory) AS blood_types_available,
                (SELECT COALESCE(SUM(quantity), 0) FROM blood_inventory) AS total_blood_units
            "#,
        )
        .fetch_one(pool)
        .await
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryReport {
    pub levels: Vec<InventoryLevel>,
}

impl InventoryReport {
    pub async fn fetch(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let levels = InventoryEntry::levels(pool).await?;
        Ok(Self { levels })
    }

    pub fn total_units(&self) -> Decimal {
        self.levels.iter().map(|l| l.total_quantity).sum()
    }

    pub fn blood_type_count(&self) -> usize {
        self.levels.len()
    }
}
