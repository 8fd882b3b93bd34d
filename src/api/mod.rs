//! API handlers for Bookshelf REST endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod openapi;
pub mod spa;
pub mod stats;
pub mod uploads;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, DefaultBodyLimit, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::de::DeserializeOwned;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use validator::Validate;

use crate::{
    error::{AppError, FieldError},
    models::SessionUser,
    services::uploads::UPLOADS_URL_PREFIX,
    AppState,
};

/// Room for multipart framing on top of the raw file size
const UPLOAD_BODY_OVERHEAD: usize = 64 * 1024;

/// Extractor for the admin identity behind the session cookie
pub struct AuthenticatedUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(&state.config.session.cookie_name)
            .map(|c| c.value().to_string())
            .ok_or_else(|| AppError::Authentication("Unauthorized".to_string()))?;

        let user = state.services.auth.authenticate(&token).await?;
        Ok(AuthenticatedUser(user))
    }
}

/// The single authorization point for protected `/api` routes.
/// Anonymous callers get 401 and the handler never runs.
pub async fn require_authenticated(
    AuthenticatedUser(user): AuthenticatedUser,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// JSON body that is deserialized and then schema-validated.
/// Both failure kinds surface as a 400 with a field list.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                AppError::Validation(vec![FieldError {
                    field: "body".to_string(),
                    message: rejection.body_text(),
                }])
            })?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Parse a book id path segment
pub fn parse_book_id(raw: &str) -> Result<i32, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid book ID".to_string()))
}

/// Non-upload methods on `/books/upload-cover` address a book whose id is "upload-cover"
async fn upload_path_as_book_id() -> AppError {
    AppError::BadRequest("Invalid book ID".to_string())
}

/// Unknown paths under `/api`, answered only to logged-in callers
async fn api_not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.services.uploads.max_file_size() + UPLOAD_BODY_OVERHEAD;
    let cookie_name = state.config.session.cookie_name.clone();

    // Everything here, unknown /api paths included, sits behind the session gate
    let protected = Router::new()
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/featured", get(books::featured_books))
        .route("/books/search/:query", get(books::search_books))
        .route("/books/genre/:genre", get(books::books_by_genre))
        .route(
            "/books/upload-cover",
            post(uploads::upload_cover)
                .layer(DefaultBodyLimit::max(upload_limit))
                .get(upload_path_as_book_id)
                .patch(upload_path_as_book_id)
                .delete(upload_path_as_book_id),
        )
        .route(
            "/books/:id",
            get(books::get_book)
                .patch(books::update_book)
                .delete(books::delete_book),
        )
        .route("/admin/stats", get(stats::get_stats))
        .fallback(api_not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_authenticated,
        ));

    let api = Router::new()
        .route("/admin/login", post(auth::login))
        .route("/admin/logout", post(auth::logout))
        .merge(protected);

    let uploaded_files: Router = Router::new()
        .nest_service(
            UPLOADS_URL_PREFIX,
            ServeDir::new(state.services.uploads.dir()),
        )
        .layer(CorsLayer::new().allow_origin(Any));

    // Existing frontend files first, then the app shell for client-side routes
    let frontend = ServeDir::new(&state.config.frontend.dir)
        .fallback(get(spa::app_shell).with_state::<()>(state.clone()));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health::health_check))
        .with_state(state)
        .merge(uploaded_files)
        .merge(openapi::create_openapi_router(&cookie_name))
        .fallback_service(frontend)
        .layer(TraceLayer::new_for_http())
}
