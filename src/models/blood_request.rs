use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::models::blood_type::BloodType;

/// Lifecycle label of a transfusion request. Any status may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Fulfilled,
    Rejected,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 3] = [
        RequestStatus::Pending,
        RequestStatus::Fulfilled,
        RequestStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Fulfilled => "fulfilled",
            RequestStatus::Rejected => "rejected",
        }
    }

    /// Label shown in the status selector
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Fulfilled => "Fulfilled",
            RequestStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Unknown request status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(RequestStatus::Pending),
            "fulfilled" => Ok(RequestStatus::Fulfilled),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BloodRequest {
    pub id: Uuid,
    pub patient_name: String,
    pub blood_type: String,
    pub quantity: Decimal,
    pub request_date: NaiveDate,
    pub status: String, // legacy rows may hold values outside RequestStatus
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateRequestData {
    pub patient_name: String,
    pub blood_type: BloodType,
    pub quantity: Decimal,
    pub request_date: NaiveDate,
}

impl BloodRequest {
    pub fn has_status(&self, status: &RequestStatus) -> bool {
        self.status == status.as_str()
    }

    /// Inserts a pending request. Requests normally arrive from the wards'
    /// own systems; this is used by intake scripts and tests.
    pub async fn create(pool: &PgPool, data: &CreateRequestData) -> Result<Self, sqlx::Error> {
        let request = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO blood_requests (patient_name, blood_type, quantity, request_date, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING *
            "#,
        )
        .bind(&data.patient_name)
        .bind(data.blood_type.as_str())
        .bind(data.quantity)
        .bind(data.request_date)
        .fetch_one(pool)
        .await?;

        Ok(request)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let request = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM blood_requests WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(request)
    }

    /// Lists every request, newest request date first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let requests = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM blood_requests
            ORDER BY request_date DESC, created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(requests)
    }

    /// Sets the status of one request. Returns `false` when no row has this id.
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE blood_requests
            SET status = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM blood_requests")
            .fetch_one(pool)
            .await
    }
}
