//! Book model and request payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Cover color used when a book is created without one
pub const DEFAULT_COVER_COLOR: &str = "purple";

/// Book record as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: Option<String>,
    pub amazon_link: Option<String>,
    pub cover_color: String,
    /// URL of an uploaded cover (see `/api/books/upload-cover`)
    pub cover_image: Option<String>,
    pub featured: bool,
    /// Date the book was added (YYYY-MM-DD)
    #[schema(value_type = String, format = Date, example = "2024-05-01")]
    pub date_added: NaiveDate,
}

/// Create book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Genre is required"))]
    pub genre: String,
    pub description: Option<String>,
    pub amazon_link: Option<String>,
    pub cover_color: Option<String>,
    pub cover_image: Option<String>,
    pub featured: Option<bool>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date_added: Option<NaiveDate>,
}

/// Partial update request. Absent fields are left untouched; nullable fields
/// can be cleared with an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    #[validate(length(min = 1, message = "Genre cannot be empty"))]
    pub genre: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub amazon_link: Option<Option<String>>,
    #[validate(length(min = 1, message = "Cover color cannot be empty"))]
    pub cover_color: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub cover_image: Option<Option<String>>,
    pub featured: Option<bool>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date_added: Option<NaiveDate>,
}

/// Empty strings count as "not provided" for optional text
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Book {
    /// Build a stored record from a create request, filling defaults
    pub fn new(id: i32, data: CreateBook, today: NaiveDate) -> Self {
        Self {
            id,
            title: data.title,
            author: data.author,
            genre: data.genre,
            description: non_empty(data.description),
            amazon_link: non_empty(data.amazon_link),
            cover_color: non_empty(data.cover_color)
                .unwrap_or_else(|| DEFAULT_COVER_COLOR.to_string()),
            cover_image: data.cover_image,
            featured: data.featured.unwrap_or(false),
            date_added: data.date_added.unwrap_or(today),
        }
    }

    /// Shallow merge: every present field overwrites, `id` is never touched
    pub fn apply(&mut self, update: UpdateBook) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(author) = update.author {
            self.author = author;
        }
        if let Some(genre) = update.genre {
            self.genre = genre;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(amazon_link) = update.amazon_link {
            self.amazon_link = amazon_link;
        }
        if let Some(cover_color) = update.cover_color {
            self.cover_color = cover_color;
        }
        if let Some(cover_image) = update.cover_image {
            self.cover_image = cover_image;
        }
        if let Some(featured) = update.featured {
            self.featured = featured;
        }
        if let Some(date_added) = update.date_added {
            self.date_added = date_added;
        }
    }

    /// Case-insensitive substring match on title, author or genre.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
            || self.genre.to_lowercase().contains(needle)
    }
}

/// Admin dashboard counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookStats {
    pub total_books: usize,
    /// Number of distinct genres
    pub total_categories: usize,
    pub featured_books: usize,
    /// Books whose `dateAdded` is today
    pub recent_books: usize,
}
