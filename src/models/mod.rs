//! Data models for Bookshelf

pub mod book;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookStats, CreateBook, UpdateBook};
pub use user::{CreateUser, SessionUser, User};
