use askama::Template;
use axum::{routing::get, Form, Router};

use crate::api::middleware::{auth::PageContext, session::AppState};
use crate::models::blood_request::{BloodRequest, RequestStatus};
use crate::services::request_tracker::{
    self, RequestUpdateError, StatusUpdateForm, MSG_LIST_FAILED, MSG_STATUS_UPDATED,
};

#[derive(Template)]
#[template(path = "requests/list.html")]
struct RequestsTemplate {
    username: String,
    requests: Vec<BloodRequest>,
    statuses: Vec<RequestStatus>,
    error: Option<String>,
    success: Option<String>,
}

async fn render(ctx: PageContext, error: Option<String>, success: Option<String>) -> RequestsTemplate {
    let (requests, error) = match BloodRequest::list_all(&ctx.pool).await {
        Ok(requests) => (requests, error),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load blood requests");
            (Vec::new(), error.or_else(|| Some(MSG_LIST_FAILED.to_string())))
        }
    };

    RequestsTemplate {
        username: ctx.user.username,
        requests,
        statuses: RequestStatus::ALL.to_vec(),
        error,
        success,
    }
}

/// List transfusion requests, newest first
async fn list_requests(ctx: PageContext) -> RequestsTemplate {
    render(ctx, None, None).await
}

/// Change the status of one request, then show the list again
async fn update_request_status(
    ctx: PageContext,
    Form(form): Form<StatusUpdateForm>,
) -> RequestsTemplate {
    match request_tracker::update_status(&ctx.pool, &form).await {
        Ok(_) => render(ctx, None, Some(MSG_STATUS_UPDATED.to_string())).await,
        Err(e) => {
            match &e {
                RequestUpdateError::Database(db) => {
                    tracing::error!(error = %db, request_id = %form.request_id, "Failed to update request status")
                }
                other => {
                    tracing::debug!(reason = %other, request_id = %form.request_id, "Rejected status update")
                }
            }
            render(ctx, Some(e.user_message()), None).await
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/requests", get(list_requests).post(update_request_status))
}
