// API module - HTTP endpoints

use axum::Router;

use self::middleware::{auth::require_auth, session::AppState};

pub mod auth;
pub mod dashboard;
pub mod donations;
pub mod health;
pub mod inventory;
pub mod middleware;
pub mod requests;

/// All application routes. Pages other than login and health sit behind the
/// session guard; the caller adds the session layer.
pub fn router() -> Router<AppState> {
    let pages = Router::new()
        .merge(dashboard::router())
        .merge(donations::router())
        .merge(requests::router())
        .merge(inventory::router())
        .route_layer(axum::middleware::from_fn(require_auth));

    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(pages)
}
