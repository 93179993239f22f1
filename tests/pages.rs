//! HTTP tests for the session guard and for pages degrading when the
//! database is unavailable.
//!
//! The router runs against a pool that can never connect, so these tests need
//! no Postgres instance.

mod common;

use axum::http::StatusCode;
use common::{body_text, build_test_app, get, location, login, post_form, unreachable_pool};

// ---------------------------------------------------------------------------
// Session guard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anonymous_pages_redirect_to_login() {
    let app = build_test_app(unreachable_pool());

    for uri in ["/dashboard", "/donations/new", "/requests", "/inventory"] {
        let response = get(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "GET {uri}");
        assert_eq!(location(&response), Some("/login"), "GET {uri}");
    }
}

#[tokio::test]
async fn anonymous_post_never_reaches_the_handler() {
    let app = build_test_app(unreachable_pool());

    let response = post_form(
        &app,
        "/donations/new",
        "donor_name=Ali&blood_type=O-&quantity=450&donation_date=2024-06-14",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn login_page_is_public() {
    let app = build_test_app(unreachable_pool());

    let response = get(&app, "/login", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Connexion"));
    assert!(body.contains("name=\"password\""));
}

#[tokio::test]
async fn logged_in_user_skips_login_page() {
    let app = build_test_app(unreachable_pool());
    let cookie = login(&app).await;

    let response = get(&app, "/login", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn root_redirects_to_dashboard() {
    let app = build_test_app(unreachable_pool());
    let cookie = login(&app).await;

    let response = get(&app, "/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn logout_closes_the_session() {
    let app = build_test_app(unreachable_pool());
    let cookie = login(&app).await;

    let response = get(&app, "/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));

    let response = get(&app, "/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

// ---------------------------------------------------------------------------
// Degraded pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dashboard_shows_zeros_when_database_is_down() {
    let app = build_test_app(unreachable_pool());
    let cookie = login(&app).await;

    let response = get(&app, "/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Bienvenue, nurse"));
    assert!(body.contains("Impossible de récupérer les statistiques"));
    assert!(body.contains("<div class=\"stat-value\">0</div>"));
}

#[tokio::test]
async fn inventory_shows_empty_report_when_database_is_down() {
    let app = build_test_app(unreachable_pool());
    let cookie = login(&app).await;

    let response = get(&app, "/inventory", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Impossible de récupérer le stock"));
    assert!(!body.contains("Critique"));
    assert!(!body.contains("Suffisant"));
}

#[tokio::test]
async fn requests_page_shows_error_when_database_is_down() {
    let app = build_test_app(unreachable_pool());
    let cookie = login(&app).await;

    let response = get(&app, "/requests", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Impossible de récupérer les demandes"));
}

// ---------------------------------------------------------------------------
// Validation happens before any write
// ---------------------------------------------------------------------------

#[tokio::test]
async fn zero_quantity_donation_is_rejected() {
    let app = build_test_app(unreachable_pool());
    let cookie = login(&app).await;

    let response = post_form(
        &app,
        "/donations/new",
        "donor_name=Ali&blood_type=O-&quantity=0&donation_date=2024-06-14",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Tous les champs sont obligatoires"));
    assert!(!body.contains("Don de sang enregistré avec succès"));
    // Submitted values are kept in the form
    assert!(body.contains("value=\"Ali\""));
}

#[tokio::test]
async fn future_donation_date_is_rejected() {
    let app = build_test_app(unreachable_pool());
    let cookie = login(&app).await;

    let response = post_form(
        &app,
        "/donations/new",
        "donor_name=Ali&blood_type=O-&quantity=450&donation_date=2999-01-01",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Date de don invalide"));
}

#[tokio::test]
async fn unknown_request_status_is_rejected() {
    let app = build_test_app(unreachable_pool());
    let cookie = login(&app).await;

    let response = post_form(
        &app,
        "/requests",
        "request_id=6f1c4d0e-2b7a-4c55-9a3e-1d2f3a4b5c6d&status=cancelled",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Statut invalide"));
    assert!(!body.contains("Statut de la demande mis à jour"));
}

#[tokio::test]
async fn health_reports_unavailable_database() {
    let app = build_test_app(unreachable_pool());

    let response = get(&app, "/health", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["database"]["status"], "unhealthy");
    // Driver details stay in the logs
    assert_eq!(json["database"]["error"], "Database unavailable");
}
