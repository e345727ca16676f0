use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::{
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
    books::{Book, BookInput, BookRepo},
    error::StoreError,
    quotes::{Quote, QuoteInput, QuoteRepo},
};

/// Process-local store used when no database is configured and in tests.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>, // keyed by email
    books: RwLock<HashMap<Uuid, Book>>,
    quotes: RwLock<HashMap<Uuid, Quote>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        // Check and insert under one write lock.
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(StoreError::UniqueViolation);
        }
        let record = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        };
        users.insert(record.email.clone(), record.clone());
        Ok(record)
    }
}

#[async_trait]
impl BookRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let mut rows: Vec<Book> = self.books.read().await.values().cloned().collect();
        rows.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Book>, StoreError> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn create(&self, input: BookInput) -> Result<Book, StoreError> {
        let book = Book {
            id: Uuid::new_v4(),
            title: input.title,
            author: input.author,
            genre: input.genre,
            publication_date: input.publication_date,
        };
        self.books.write().await.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: Uuid, input: BookInput) -> Result<Option<Book>, StoreError> {
        let mut books = self.books.write().await;
        Ok(books.get_mut(&id).map(|book| {
            book.title = input.title;
            book.author = input.author;
            book.genre = input.genre;
            book.publication_date = input.publication_date;
            book.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.books.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl QuoteRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Quote>, StoreError> {
        let mut rows: Vec<Quote> = self.quotes.read().await.values().cloned().collect();
        rows.sort_by(|a, b| (&a.author, &a.quote_text).cmp(&(&b.author, &b.quote_text)));
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Quote>, StoreError> {
        Ok(self.quotes.read().await.get(&id).cloned())
    }

    async fn create(&self, input: QuoteInput) -> Result<Quote, StoreError> {
        let quote = Quote {
            id: Uuid::new_v4(),
            quote_text: input.quote_text,
            author: input.author,
        };
        self.quotes.write().await.insert(quote.id, quote.clone());
        Ok(quote)
    }

    async fn update(&self, id: Uuid, input: QuoteInput) -> Result<Option<Quote>, StoreError> {
        let mut quotes = self.quotes.write().await;
        Ok(quotes.get_mut(&id).map(|quote| {
            quote.quote_text = input.quote_text;
            quote.author = input.author;
            quote.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.quotes.write().await.remove(&id).is_some())
    }
}
