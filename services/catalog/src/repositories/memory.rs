//! In-memory `BookStore` for tests

use async_trait::async_trait;
use common::error::DatabaseResult;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::BookStore;
use crate::catalog::BookFilter;
use crate::models::{Book, NewBook};

#[derive(Clone, Default)]
pub struct InMemoryBookStore {
    books: Arc<RwLock<Vec<Book>>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, book: NewBook) -> Book {
        self.insert(&book).await.expect("in-memory insert cannot fail")
    }
}

fn to_book(id: Uuid, book: &NewBook) -> Book {
    Book {
        id,
        category: book.category,
        author: book.author.clone(),
        series: book.series.clone(),
        name: book.name.clone(),
        annotation: book.annotation.clone(),
        link: book.link.clone(),
        access: book.access.clone(),
        publication: book.publication,
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn query_books(&self, filter: Option<&BookFilter>) -> DatabaseResult<Vec<Book>> {
        let books = self.books.read().await;
        let mut rows: Vec<Book> = books
            .iter()
            .filter(|b| filter.is_none_or(|f| f.matches(b)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.category
                .as_str()
                .cmp(b.category.as_str())
                .then_with(|| a.author.cmp(&b.author))
        });
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Book>> {
        Ok(self.books.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn insert(&self, book: &NewBook) -> DatabaseResult<Book> {
        let book = to_book(Uuid::new_v4(), book);
        self.books.write().await.push(book.clone());
        Ok(book)
    }

    async fn update(&self, id: Uuid, book: &NewBook) -> DatabaseResult<bool> {
        let mut books = self.books.write().await;
        match books.iter_mut().find(|b| b.id == id) {
            Some(existing) => {
                *existing = to_book(id, book);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|b| b.id != id);
        Ok(books.len() != before)
    }
}
