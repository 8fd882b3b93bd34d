//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, stats, uploads};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.1.0",
        description = "Book catalog REST API with session-based admin login",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Auth
        auth::login,
        auth::logout,
        // Books
        books::list_books,
        books::featured_books,
        books::get_book,
        books::search_books,
        books::books_by_genre,
        books::create_book,
        books::update_book,
        books::delete_book,
        uploads::upload_cover,
        // Stats
        stats::get_stats,
        // Health
        health::health_check,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::LoginRequest,
            crate::models::user::MessageResponse,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            uploads::CoverUploadForm,
            uploads::CoverUploadResponse,
            // Stats
            crate::models::book::BookStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldError,
        )
    ),
    security(("session_cookie" = [])),
    tags(
        (name = "auth", description = "Admin session endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "stats", description = "Statistics"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Generate the document, registering the configured session cookie as the security scheme
pub fn openapi_document(cookie_name: &str) -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    if let Some(components) = openapi.components.as_mut() {
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(cookie_name))),
        );
    }
    openapi
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router(cookie_name: &str) -> Router {
    Router::new().merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi_document(cookie_name)),
    )
}
