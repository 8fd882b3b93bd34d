//! In-memory record store

use async_trait::async_trait;
use chrono::Local;
use tokio::sync::RwLock;

use super::Storage;
use crate::{
    error::AppResult,
    models::{Book, CreateBook, CreateUser, UpdateBook, User},
};

#[derive(Debug)]
struct Tables {
    books: Vec<Book>,
    users: Vec<User>,
    next_book_id: i32,
    next_user_id: i32,
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                books: Vec::new(),
                users: Vec::new(),
                next_book_id: 1,
                next_user_id: 1,
            }),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_user(&self, data: CreateUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        let user = User {
            id: tables.next_user_id,
            username: data.username,
            password: data.password,
        };
        tables.next_user_id += 1;
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        Ok(self.tables.read().await.books.clone())
    }

    async fn get_book(&self, id: i32) -> AppResult<Option<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.iter().find(|b| b.id == id).cloned())
    }

    async fn create_book(&self, data: CreateBook) -> AppResult<Book> {
        let today = Local::now().date_naive();
        let mut tables = self.tables.write().await;
        let book = Book::new(tables.next_book_id, data, today);
        tables.next_book_id += 1;
        tables.books.push(book.clone());
        Ok(book)
    }

    async fn update_book(&self, id: i32, data: UpdateBook) -> AppResult<Option<Book>> {
        let mut tables = self.tables.write().await;
        Ok(tables.books.iter_mut().find(|b| b.id == id).map(|book| {
            book.apply(data);
            book.clone()
        }))
    }

    async fn delete_book(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.books.len();
        tables.books.retain(|b| b.id != id);
        Ok(tables.books.len() != before)
    }

    async fn featured_books(&self) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.iter().filter(|b| b.featured).cloned().collect())
    }

    async fn books_by_genre(&self, genre: &str) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .iter()
            .filter(|b| b.genre == genre)
            .cloned()
            .collect())
    }

    async fn search_books(&self, query: &str) -> AppResult<Vec<Book>> {
        let needle = query.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .iter()
            .filter(|b| b.matches(&needle))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(title: &str, author: &str, genre: &str) -> CreateBook {
        CreateBook {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_record() {
        let store = MemoryStorage::new();
        let created = store
            .create_book(new_book("Dune", "Herbert", "Sci-Fi"))
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(store.get_book(1).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let store = MemoryStorage::new();
        let first = store.create_book(new_book("A", "X", "G")).await.unwrap();
        assert!(store.delete_book(first.id).await.unwrap());

        let second = store.create_book(new_book("B", "Y", "G")).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let store = MemoryStorage::new();
        let book = store.create_book(new_book("Dune", "Herbert", "Sci-Fi")).await.unwrap();

        assert!(store.delete_book(book.id).await.unwrap());
        assert_eq!(store.get_book(book.id).await.unwrap(), None);
        assert!(!store.delete_book(book.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_featured_keeps_other_fields() {
        let store = MemoryStorage::new();
        let book = store.create_book(new_book("Dune", "Herbert", "Sci-Fi")).await.unwrap();

        let updated = store
            .update_book(
                book.id,
                UpdateBook {
                    featured: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated, Book { featured: true, ..book });
        assert_eq!(store.get_book(updated.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = MemoryStorage::new();
        let result = store.update_book(42, UpdateBook::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_is_a_snapshot() {
        let store = MemoryStorage::new();
        store.create_book(new_book("Dune", "Herbert", "Sci-Fi")).await.unwrap();

        let mut snapshot = store.list_books().await.unwrap();
        snapshot.clear();

        assert_eq!(store.list_books().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_and_genre_filters() {
        let store = MemoryStorage::new();
        store.create_book(new_book("Dune", "Herbert", "Sci-Fi")).await.unwrap();
        store.create_book(new_book("Hyperion", "Simmons", "sci-fi")).await.unwrap();
        store.create_book(new_book("Emma", "Austen", "Romance")).await.unwrap();

        let found = store.search_books("dune").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Dune");

        let by_genre = store.books_by_genre("Sci-Fi").await.unwrap();
        assert_eq!(by_genre.len(), 1);
        assert_eq!(by_genre[0].title, "Dune");

        assert_eq!(store.search_books("SCI").await.unwrap().len(), 2);
        assert_eq!(store.search_books("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_featured_in_store_order() {
        let store = MemoryStorage::new();
        for (title, featured) in [("A", true), ("B", false), ("C", true)] {
            store
                .create_book(CreateBook {
                    featured: Some(featured),
                    ..new_book(title, "X", "G")
                })
                .await
                .unwrap();
        }

        let titles: Vec<String> = store
            .featured_books()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_users_lookup() {
        let store = MemoryStorage::new();
        let admin = store
            .create_user(CreateUser {
                username: "admin".into(),
                password: "admin123".into(),
            })
            .await
            .unwrap();

        assert_eq!(admin.id, 1);
        assert_eq!(store.get_user(1).await.unwrap(), Some(admin.clone()));
        assert_eq!(store.get_user_by_username("admin").await.unwrap(), Some(admin));
        assert_eq!(store.get_user_by_username("root").await.unwrap(), None);
    }
}
