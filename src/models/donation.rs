use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::models::blood_type::BloodType;

/// Status every donation starts in
pub const STATUS_PENDING: &str = "pending";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Donation {
    pub id: Uuid,
    pub donor_name: String,
    pub blood_type: String,
    pub quantity: Decimal,
    pub donation_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateDonationData {
    pub donor_name: String,
    pub blood_type: BloodType,
    /// Milliliters, two decimal places
    pub quantity: Decimal,
    pub donation_date: NaiveDate,
}

impl Donation {
    /// Inserts a donation in the `pending` status.
    ///
    /// Takes a connection rather than the pool so the caller can run it inside
    /// the same transaction as the inventory upsert.
    pub async fn create(
        conn: &mut PgConnection,
        data: &CreateDonationData,
    ) -> Result<Self, sqlx::Error> {
        let donation = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO blood_donations (donor_name, blood_type, quantity, donation_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.donor_name)
        .bind(data.blood_type.as_str())
        .bind(data.quantity)
        .bind(data.donation_date)
        .bind(STATUS_PENDING)
        .fetch_one(conn)
        .await?;

        Ok(donation)
    }

    /// Lists donations, most recent first
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        let donations = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM blood_donations
            ORDER BY donation_date DESC, created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(donations)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM blood_donations")
            .fetch_one(pool)
            .await
    }
}
