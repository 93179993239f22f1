use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::PgPool;
use tower_sessions::Session;
use uuid::Uuid;

use super::session::{AppState, SESSION_KEY_USERNAME, SESSION_KEY_USER_ID};

/// Where unauthenticated visitors are sent
pub const LOGIN_PATH: &str = "/login";

/// Authentication error responses
#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    SessionError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthorized => Redirect::to(LOGIN_PATH).into_response(),
            AuthError::SessionError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Session error occurred.").into_response()
            }
        }
    }
}

/// Middleware that redirects to the login page unless a user is logged in
pub async fn require_auth(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user_id: Option<Uuid> = session
        .get(SESSION_KEY_USER_ID)
        .await
        .map_err(|_| AuthError::SessionError)?;

    if user_id.is_none() {
        tracing::debug!(path = %request.uri().path(), "No session user, redirecting to login");
        return Err(AuthError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// The logged-in staff member
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
}

/// Extracts the authenticated user from the session
pub async fn get_authenticated_user(session: &Session) -> Result<AuthenticatedUser, AuthError> {
    let user_id: Uuid = session
        .get(SESSION_KEY_USER_ID)
        .await
        .map_err(|_| AuthError::SessionError)?
        .ok_or(AuthError::Unauthorized)?;

    let username: String = session
        .get(SESSION_KEY_USERNAME)
        .await
        .map_err(|_| AuthError::SessionError)?
        .unwrap_or_default();

    Ok(AuthenticatedUser { user_id, username })
}

/// Per-request context handed to page handlers: who is asking and the
/// database to ask. Extraction fails with a login redirect, so a handler
/// taking a `PageContext` never runs for anonymous visitors.
#[derive(Clone)]
pub struct PageContext {
    pub user: AuthenticatedUser,
    pub pool: PgPool,
}

#[async_trait]
impl FromRequestParts<AppState> for PageContext {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthError::SessionError)?;
        let user = get_authenticated_user(&session).await?;

        Ok(PageContext {
            user,
            pool: state.pool.clone(),
        })
    }
}
