use askama::Template;
use axum::{routing::get, Form, Router};
use chrono::{Local, NaiveDate};
use sqlx::PgPool;

use crate::api::middleware::{auth::PageContext, session::AppState};
use crate::models::{blood_type::BloodType, donation::Donation};
use crate::services::donation_recorder::{self, DonationError, DonationForm, MSG_RECORDED};

/// How many past donations the form page lists
const RECENT_DONATIONS: i64 = 10;

#[derive(Template)]
#[template(path = "donations/new.html")]
struct NewDonationTemplate {
    username: String,
    blood_types: Vec<BloodType>,
    form: DonationForm,
    max_date: String,
    recent: Vec<Donation>,
    error: Option<String>,
    success: Option<String>,
}

impl NewDonationTemplate {
    async fn render_for(
        ctx: PageContext,
        today: NaiveDate,
        form: DonationForm,
        error: Option<String>,
        success: Option<String>,
    ) -> Self {
        let recent = recent_donations(&ctx.pool).await;

        Self {
            username: ctx.user.username,
            blood_types: BloodType::ALL.to_vec(),
            form,
            max_date: today.format("%Y-%m-%d").to_string(),
            recent,
            error,
            success,
        }
    }
}

async fn recent_donations(pool: &PgPool) -> Vec<Donation> {
    Donation::list_recent(pool, RECENT_DONATIONS)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load recent donations");
            Vec::new()
        })
}

/// Show the donation form
async fn new_donation_form(ctx: PageContext) -> NewDonationTemplate {
    let today = Local::now().date_naive();
    NewDonationTemplate::render_for(ctx, today, DonationForm::default(), None, None).await
}

/// Record a donation and add it to stock
async fn create_donation(ctx: PageContext, Form(form): Form<DonationForm>) -> NewDonationTemplate {
    let today = Local::now().date_naive();

    match donation_recorder::submit(&ctx.pool, &form, today).await {
        Ok(_) => {
            NewDonationTemplate::render_for(
                ctx,
                today,
                DonationForm::default(),
                None,
                Some(MSG_RECORDED.to_string()),
            )
            .await
        }
        Err(e) => {
            match &e {
                DonationError::Validation(v) => {
                    tracing::debug!(user_id = %ctx.user.user_id, reason = %v, "Rejected donation form")
                }
                DonationError::Database(db) => {
                    tracing::error!(user_id = %ctx.user.user_id, error = %db, "Failed to record donation")
                }
            }
            let message = e.user_message();
            NewDonationTemplate::render_for(ctx, today, form, Some(message), None).await
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/donations/new", get(new_donation_form).post(create_donation))
}
