use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::blood_request::{BloodRequest, RequestStatus};

pub const MSG_STATUS_UPDATED: &str = "Statut de la demande mis à jour";
pub const MSG_LIST_FAILED: &str = "Impossible de récupérer les demandes";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdateForm {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(thiserror::Error, Debug)]
pub enum RequestUpdateError {
    #[error("Statut invalide")]
    InvalidStatus,

    #[error("Demande introuvable")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RequestUpdateError {
    pub fn user_message(&self) -> String {
        match self {
            RequestUpdateError::Database(_) => "Erreur lors de la mise à jour".to_string(),
            other => other.to_string(),
        }
    }
}

/// Parses the form into a request id and a known status
pub fn parse_update(form: &StatusUpdateForm) -> Result<(Uuid, RequestStatus), RequestUpdateError> {
    let id = Uuid::parse_str(form.request_id.trim()).map_err(|_| RequestUpdateError::NotFound)?;
    let status = form
        .status
        .parse::<RequestStatus>()
        .map_err(|_| RequestUpdateError::InvalidStatus)?;

    Ok((id, status))
}

/// Applies a status change submitted from the request list
pub async fn update_status(
    pool: &PgPool,
    form: &StatusUpdateForm,
) -> Result<RequestStatus, RequestUpdateError> {
    let (id, status) = parse_update(form)?;

    if !BloodRequest::update_status(pool, id, status).await? {
        return Err(RequestUpdateError::NotFound);
    }

    tracing::info!(request_id = %id, status = %status, "Updated blood request status");

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(id: &str, status: &str) -> StatusUpdateForm {
        StatusUpdateForm {
            request_id: id.to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_parse_valid_update() {
        let id = Uuid::new_v4();
        let (parsed_id, status) = parse_update(&form(&id.to_string(), "fulfilled")).unwrap();

        assert_eq!(parsed_id, id);
        assert_eq!(status, RequestStatus::Fulfilled);
    }

    #[test]
    fn test_arbitrary_status_is_rejected() {
        let id = Uuid::new_v4().to_string();
        let err = parse_update(&form(&id, "cancelled")).unwrap_err();

        assert!(matches!(err, RequestUpdateError::InvalidStatus));
        assert_eq!(err.user_message(), "Statut invalide");
    }

    #[test]
    fn test_malformed_id_is_not_found() {
        let err = parse_update(&form("42", "pending")).unwrap_err();

        assert!(matches!(err, RequestUpdateError::NotFound));
        assert_eq!(err.user_message(), "Demande introuvable");
    }

    #[test]
    fn test_database_error_message_is_generic() {
        let err = RequestUpdateError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.user_message(), "Erreur lors de la mise à jour");
    }
}
