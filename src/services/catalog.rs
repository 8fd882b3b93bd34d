//! Catalog service: book CRUD, queries and admin statistics

use std::{collections::HashSet, sync::Arc};

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookStats, CreateBook, UpdateBook},
    repository::Storage,
};

fn book_not_found() -> AppError {
    AppError::NotFound("Book not found".to_string())
}

#[derive(Clone)]
pub struct CatalogService {
    storage: Arc<dyn Storage>,
}

impl CatalogService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.storage.list_books().await
    }

    pub async fn featured_books(&self) -> AppResult<Vec<Book>> {
        self.storage.featured_books().await
    }

    pub async fn books_by_genre(&self, genre: &str) -> AppResult<Vec<Book>> {
        self.storage.books_by_genre(genre).await
    }

    pub async fn search_books(&self, query: &str) -> AppResult<Vec<Book>> {
        self.storage.search_books(query).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.storage.get_book(id).await?.ok_or_else(book_not_found)
    }

    pub async fn create_book(&self, data: CreateBook) -> AppResult<Book> {
        let book = self.storage.create_book(data).await?;
        tracing::info!("Created book {} '{}'", book.id, book.title);
        Ok(book)
    }

    pub async fn update_book(&self, id: i32, data: UpdateBook) -> AppResult<Book> {
        self.storage
            .update_book(id, data)
            .await?
            .ok_or_else(book_not_found)
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        if !self.storage.delete_book(id).await? {
            return Err(book_not_found());
        }
        tracing::info!("Deleted book {}", id);
        Ok(())
    }

    /// Dashboard counters from a single scan of the catalog
    pub async fn stats(&self, today: NaiveDate) -> AppResult<BookStats> {
        let books = self.storage.list_books().await?;
        let genres: HashSet<&str> = books.iter().map(|b| b.genre.as_str()).collect();

        Ok(BookStats {
            total_books: books.len(),
            total_categories: genres.len(),
            featured_books: books.iter().filter(|b| b.featured).count(),
            recent_books: books.iter().filter(|b| b.date_added == today).count(),
        })
    }
}
