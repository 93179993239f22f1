use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use crate::models::{
    blood_type::BloodType,
    donation::{CreateDonationData, Donation},
    inventory::InventoryEntry,
};

pub const MSG_RECORDED: &str = "Don de sang enregistré avec succès";
pub const MSG_SAVE_FAILED: &str = "Erreur lors de l'enregistrement du don";

/// Raw fields of the donation form, exactly as submitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonationForm {
    #[serde(default)]
    pub donor_name: String,
    #[serde(default)]
    pub blood_type: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub donation_date: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Tous les champs sont obligatoires")]
    MissingFields,

    #[error("Type de sang invalide")]
    InvalidBloodType,

    #[error("Date de don invalide")]
    InvalidDate,
}

#[derive(thiserror::Error, Debug)]
pub enum DonationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DonationError {
    /// Message shown to staff. Database details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            DonationError::Validation(e) => e.to_string(),
            DonationError::Database(_) => MSG_SAVE_FAILED.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedDonation {
    pub donation: Donation,
    pub inventory: InventoryEntry,
}

/// Checks a submitted form against `today`, in order: required fields and a
/// positive quantity, a known blood type, then a `YYYY-MM-DD` date that is not
/// in the future. Quantities are kept to two decimal places.
pub fn validate(form: &DonationForm, today: NaiveDate) -> Result<CreateDonationData, ValidationError> {
    let donor_name = form.donor_name.trim();
    let blood_type = form.blood_type.trim();
    let donation_date = form.donation_date.trim();
    // Anything that is not a number counts as zero
    let quantity = form
        .quantity
        .trim()
        .parse::<Decimal>()
        .map(|q| q.round_dp(2))
        .unwrap_or(Decimal::ZERO);

    if donor_name.is_empty()
        || blood_type.is_empty()
        || donation_date.is_empty()
        || quantity <= Decimal::ZERO
    {
        return Err(ValidationError::MissingFields);
    }

    let blood_type = blood_type
        .parse::<BloodType>()
        .map_err(|_| ValidationError::InvalidBloodType)?;

    let donation_date = NaiveDate::parse_from_str(donation_date, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate)?;
    if donation_date > today {
        return Err(ValidationError::InvalidDate);
    }

    Ok(CreateDonationData {
        donor_name: donor_name.to_string(),
        blood_type,
        quantity,
        donation_date,
    })
}

/// Persists a validated donation and adds it to stock in one transaction.
pub async fn record(
    pool: &PgPool,
    data: &CreateDonationData,
) -> Result<RecordedDonation, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let donation = Donation::create(&mut *tx, data).await?;
    let inventory =
        InventoryEntry::add_units(&mut *tx, data.blood_type, data.quantity, data.donation_date)
            .await?;

    tx.commit().await?;

    tracing::info!(
        donation_id = %donation.id,
        blood_type = %data.blood_type,
        quantity = %data.quantity,
        stock = %inventory.quantity,
        "Recorded donation"
    );

    Ok(RecordedDonation {
        donation,
        inventory,
    })
}

/// Validates then records a submitted form
pub async fn submit(
    pool: &PgPool,
    form: &DonationForm,
    today: NaiveDate,
) -> Result<RecordedDonation, DonationError> {
    let data = validate(form, today)?;
    let recorded = record(pool, &data).await?;
    Ok(recorded)
}
