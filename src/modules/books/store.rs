//! Book storage behind a trait so handlers never see the backing table.

use async_trait::async_trait;
use bookcase_db::Table;
use thiserror::Error;

use super::models::{Book, BookForm, BookId, SeedBook, ValidationErrors};

/// Failures a [`BookStore`] reports.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The submission broke a field rule; nothing was written.
    #[error("book rejected: {0}")]
    Validation(ValidationErrors),

    #[error("book {0} not found")]
    NotFound(BookId),

    /// The backing storage failed.
    #[error("book store unavailable: {0:#}")]
    Unavailable(anyhow::Error),
}

/// Persistent owner of book records. Validation happens here, not in the
/// handlers.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books in id order.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    async fn get(&self, id: BookId) -> Result<Option<Book>, StoreError>;

    async fn create(&self, form: BookForm) -> Result<Book, StoreError>;

    /// Replace every editable field of book `id`.
    async fn update(&self, id: BookId, form: BookForm) -> Result<(), StoreError>;

    async fn delete(&self, id: BookId) -> Result<(), StoreError>;
}

/// [`BookStore`] over an in-memory [`Table`].
pub struct MemoryBookStore {
    books: Table<Book>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self {
            books: Table::new("books"),
        }
    }

    /// Build a store pre-filled with `seed`. Every entry must validate.
    pub async fn seeded(seed: Vec<SeedBook>) -> anyhow::Result<Self> {
        let store = Self::new();
        for (index, entry) in seed.into_iter().enumerate() {
            let form = BookForm::from(entry);
            match store.create(form).await {
                Ok(_) => {}
                Err(StoreError::Validation(errors)) => {
                    let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
                    anyhow::bail!("seed entry {index} is invalid: {}", messages.join("; "));
                }
                Err(err) => return Err(err.into()),
            }
        }
        tracing::info!(books = store.books.len().await, "book store seeded");
        Ok(store)
    }
}

impl Default for MemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.books.list().await)
    }

    async fn get(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        Ok(self.books.get(id).await)
    }

    async fn create(&self, form: BookForm) -> Result<Book, StoreError> {
        let fields = form.validate().map_err(StoreError::Validation)?;
        let book = self.books.insert_with(|id| fields.into_book(id)).await;

        tracing::info!(book_id = book.id, title = %book.title, "book created");
        Ok(book)
    }

    async fn update(&self, id: BookId, form: BookForm) -> Result<(), StoreError> {
        let fields = form.validate().map_err(StoreError::Validation)?;

        if !self.books.replace(id, fields.into_book(id)).await {
            return Err(StoreError::NotFound(id));
        }

        tracing::info!(book_id = id, "book updated");
        Ok(())
    }

    async fn delete(&self, id: BookId) -> Result<(), StoreError> {
        match self.books.remove(id).await {
            Some(book) => {
                tracing::info!(book_id = id, title = %book.title, "book deleted");
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }
}
