use askama::Template;
use axum::{response::Redirect, routing::get, Router};

use crate::api::middleware::{auth::PageContext, session::AppState};
use crate::services::reports::DashboardStats;

const MSG_STATS_FAILED: &str = "Impossible de récupérer les statistiques";

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    username: String,
    stats: DashboardStats,
    error: Option<String>,
    success: Option<String>,
}

/// Key figures for the blood bank. Falls back to zeros when the query fails.
async fn dashboard(ctx: PageContext) -> DashboardTemplate {
    let (stats, error) = match DashboardStats::fetch(&ctx.pool).await {
        Ok(stats) => (stats, None),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load dashboard statistics");
            (DashboardStats::default(), Some(MSG_STATS_FAILED.to_string()))
        }
    };

    DashboardTemplate {
        username: ctx.user.username,
        stats,
        error,
        success: None,
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/dashboard", get(dashboard))
}
