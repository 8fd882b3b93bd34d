//! Catch-all serving the client application shell

use std::io::ErrorKind;

use axum::{
    extract::State,
    http::Uri,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    error::{AppError, AppResult},
    AppState,
};

use super::AuthenticatedUser;

const ADMIN_PREFIX: &str = "/admin";
const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// Serve `index.html`, sending anonymous visitors of admin pages to the login page
pub async fn app_shell(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    uri: Uri,
) -> AppResult<Response> {
    let path = uri.path();
    if path.starts_with(ADMIN_PREFIX) && path != ADMIN_LOGIN_PATH && user.is_none() {
        return Ok(Redirect::to(ADMIN_LOGIN_PATH).into_response());
    }

    let index = state.config.frontend.dir.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("Application shell missing at {}", index.display());
            Err(AppError::NotFound("Application shell not found".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
