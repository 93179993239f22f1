use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::api::middleware::session::{AppState, SESSION_KEY_USERNAME, SESSION_KEY_USER_ID};
use crate::error::Result;
use crate::models::user::User;
use crate::services::password;

const MSG_INVALID_CREDENTIALS: &str = "Identifiants invalides";
const MSG_LOGIN_UNAVAILABLE: &str = "Connexion impossible, réessayez plus tard";

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    username: String,
    error: Option<String>,
}

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Shows the login form, or skips it when already logged in
async fn login_page(session: Session) -> Result<Response> {
    let user_id: Option<Uuid> = session.get(SESSION_KEY_USER_ID).await?;
    if user_id.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    Ok(LoginTemplate {
        username: String::new(),
        error: None,
    }
    .into_response())
}

/// Checks credentials and opens the session
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let username = form.username.trim().to_string();
    let retry = |error: &str| {
        LoginTemplate {
            username: username.clone(),
            error: Some(error.to_string()),
        }
        .into_response()
    };

    if username.is_empty() || form.password.is_empty() {
        return Ok(retry(MSG_INVALID_CREDENTIALS));
    }

    let user = match User::find_by_username(&state.pool, &username).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up user");
            return Ok(retry(MSG_LOGIN_UNAVAILABLE));
        }
    };

    let Some(user) = user else {
        tracing::info!(username = %username, "Login attempt for unknown user");
        return Ok(retry(MSG_INVALID_CREDENTIALS));
    };

    let verified = match password::verify_password(&form.password, &user.password_hash) {
        Ok(verified) => verified,
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "Stored password hash is unusable");
            false
        }
    };

    if !verified {
        tracing::info!(user_id = %user.id, "Login rejected");
        return Ok(retry(MSG_INVALID_CREDENTIALS));
    }

    session.cycle_id().await?;
    session.insert(SESSION_KEY_USER_ID, user.id).await?;
    session.insert(SESSION_KEY_USERNAME, &user.username).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Redirect::to("/dashboard").into_response())
}

/// Logs out the user
async fn logout(session: Session) -> Result<Redirect> {
    session.flush().await?;

    Ok(Redirect::to("/login"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}
