//! Admin login/logout endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    error::{AppError, AppResult},
    models::user::{LoginRequest, MessageResponse},
    services::auth::AuthError,
    AppState,
};

/// Log in with the admin credentials and receive a session cookie
#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = MessageResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    // A body that is not a JSON object carries no credentials at all
    let Json(request) = request.map_err(|_| AppError::from(AuthError::MissingCredentials))?;
    let session_config = &state.config.session;

    let session = state
        .services
        .auth
        .login(&request.username, &request.password)
        .await?;

    // Drop whatever session the client was carrying before
    if let Some(previous) = jar.get(&session_config.cookie_name) {
        state.services.auth.logout(Some(previous.value())).await?;
    }

    let cookie = Cookie::build((session_config.cookie_name.clone(), session.id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(session_config.secure_cookie)
        .max_age(time::Duration::hours(session_config.ttl_hours));

    Ok((jar.add(cookie), Json(MessageResponse::new("Login successful"))))
}

/// End the current session. Succeeds even without one.
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 500, description = "Session could not be destroyed", body = crate::error::ErrorResponse)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    let cookie_name = state.config.session.cookie_name.clone();
    let token = jar.get(&cookie_name).map(|c| c.value().to_string());

    state
        .services
        .auth
        .logout(token.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Session destroy error: {}", e);
            AppError::Session("Error during logout".to_string())
        })?;

    let jar = jar.remove(Cookie::build((cookie_name, "")).path("/"));
    Ok((jar, Json(MessageResponse::new("Logout successful"))))
}
