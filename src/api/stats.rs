//! Admin dashboard statistics

use axum::{extract::State, Json};
use chrono::Local;

use crate::{error::AppResult, models::BookStats, AppState};

/// Catalog counters for the admin dashboard
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Catalog statistics", body = BookStats),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<BookStats>> {
    let today = Local::now().date_naive();
    let stats = state.services.catalog.stats(today).await?;
    Ok(Json(stats))
}
