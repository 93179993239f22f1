use askama::Template;
use axum::{routing::get, Router};

use crate::api::middleware::{auth::PageContext, session::AppState};
use crate::services::reports::InventoryReport;

const MSG_INVENTORY_FAILED: &str = "Impossible de récupérer le stock";

#[derive(Template)]
#[template(path = "inventory/list.html")]
struct InventoryTemplate {
    username: String,
    report: InventoryReport,
    error: Option<String>,
    success: Option<String>,
}

/// Stock per blood type with a critical/sufficient label
async fn list_inventory(ctx: PageContext) -> InventoryTemplate {
    let (report, error) = match InventoryReport::fetch(&ctx.pool).await {
        Ok(report) => (report, None),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load inventory");
            (InventoryReport::default(), Some(MSG_INVENTORY_FAILED.to_string()))
        }
    };

    InventoryTemplate {
        username: ctx.user.username,
        report,
        error,
        success: None,
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/inventory", get(list_inventory))
}
