use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::models::blood_type::BloodType;

/// Days a unit stays usable after collection
pub const SHELF_LIFE_DAYS: i64 = 42;

/// Below this many units a blood type is reported as critical
pub const CRITICAL_THRESHOLD: i64 = 10;

/// Expiration assigned to the first stock row of a blood type
pub fn expiration_for(donation_date: NaiveDate) -> NaiveDate {
    donation_date + Duration::days(SHELF_LIFE_DAYS)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryEntry {
    pub blood_type: String,
    pub quantity: Decimal,
    pub expiration_date: NaiveDate,
    pub donation_count: i32,
    pub updated_at: DateTime<Utc>,
}

/// One line of the stock report
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryLevel {
    pub blood_type: String,
    pub total_quantity: Decimal,
    pub earliest_expiration: NaiveDate,
    pub donation_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockLevel {
    Critical,
    Sufficient,
}

impl StockLevel {
    pub fn classify(quantity: Decimal) -> Self {
        if quantity < Decimal::from(CRITICAL_THRESHOLD) {
            StockLevel::Critical
        } else {
            StockLevel::Sufficient
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockLevel::Critical => "Critique",
            StockLevel::Sufficient => "Suffisant",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            StockLevel::Critical => "status-low",
            StockLevel::Sufficient => "status-good",
        }
    }
}

impl InventoryLevel {
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(self.total_quantity)
    }
}

impl InventoryEntry {
    /// Adds donated units to the stock row of a blood type.
    ///
    /// The first donation of a type creates the row with an expiration
    /// `SHELF_LIFE_DAYS` after the donation date; later donations only
    /// increase quantity and count.
    pub async fn add_units(
        conn: &mut PgConnection,
        blood_type: BloodType,
        quantity: Decimal,
        donation_date: NaiveDate,
    ) -> Result<Self, sqlx::Error> {
        let entry = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO blood_inventory (blood_type, quantity, expiration_date, donation_count)
            VALUES ($1, $2, $3, 1)
            ON CONFLICT (blood_type) DO UPDATE
            SET
                quantity = blood_inventory.quantity + EXCLUDED.quantity,
                donation_count = blood_inventory.donation_count + 1,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(blood_type.as_str())
        .bind(quantity)
        .bind(expiration_for(donation_date))
        .fetch_one(conn)
        .await?;

        Ok(entry)
    }

    pub async fn find_by_blood_type(
        pool: &PgPool,
        blood_type: BloodType,
    ) -> Result<Option<Self>, sqlx::Error> {
        let entry = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM blood_inventory WHERE blood_type = $1
            "#,
        )
        .bind(blood_type.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(entry)
    }

    /// Per blood type totals, largest stock first
    pub async fn levels(pool: &PgPool) -> Result<Vec<InventoryLevel>, sqlx::Error> {
        let levels = sqlx::query_as::<_, InventoryLevel>(
            r#"
            SELECT
                blood_type,
                SUM(quantity) AS total_quantity,
                MIN(expiration_date) AS earliest_expiration,
                SUM(donation_count) AS donation_count
            FROM blood_inventory
            GROUP BY blood_type
            ORDER BY total_quantity DESC, blood_type
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(levels)
    }
}
