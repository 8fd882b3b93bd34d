//! Repository layer: the record store behind the catalog and auth services

pub mod memory;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Book, CreateBook, CreateUser, UpdateBook, User},
};

pub use memory::MemoryStorage;

/// Capability set of a book/user record store.
///
/// Each operation is atomic with respect to the others. Implementations own
/// id assignment: ids are monotonically increasing and never reused.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_user(&self, data: CreateUser) -> AppResult<User>;

    async fn get_user(&self, id: i32) -> AppResult<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Snapshot of every book, in insertion order
    async fn list_books(&self) -> AppResult<Vec<Book>>;

    async fn get_book(&self, id: i32) -> AppResult<Option<Book>>;

    async fn create_book(&self, data: CreateBook) -> AppResult<Book>;

    /// Merge `data` onto the book; `None` if the id is unknown
    async fn update_book(&self, id: i32, data: UpdateBook) -> AppResult<Option<Book>>;

    /// Returns whether a record was removed
    async fn delete_book(&self, id: i32) -> AppResult<bool>;

    async fn featured_books(&self) -> AppResult<Vec<Book>>;

    /// Exact, case-sensitive genre match
    async fn books_by_genre(&self, genre: &str) -> AppResult<Vec<Book>>;

    /// Case-insensitive substring search over title, author and genre
    async fn search_books(&self, query: &str) -> AppResult<Vec<Book>>;
}
