//! Request orchestration for the books module.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::error::BookError;
use super::mapper;
use super::models::{
    now_millis, BookListResponse, BookResponse, CreateBookRequest, UpdateBookRequest,
};
use super::repository::BookRepository;
use super::validation::validate;

/// One operation per resource action.
#[async_trait]
pub trait BookService: Send + Sync {
    async fn list(&self) -> Result<BookListResponse, BookError>;

    async fn get(&self, id: &str) -> Result<BookResponse, BookError>;

    /// Returns the identifier assigned to the new book.
    async fn create(&self, request: CreateBookRequest) -> Result<String, BookError>;

    async fn update(&self, request: UpdateBookRequest) -> Result<bool, BookError>;

    async fn delete(&self, id: &str) -> Result<bool, BookError>;
}

/// [`BookService`] over any [`BookRepository`].
pub struct DefaultBookService {
    repository: Arc<dyn BookRepository>,
}

impl DefaultBookService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl BookService for DefaultBookService {
    async fn list(&self) -> Result<BookListResponse, BookError> {
        let books = self.repository.find_all().await?;
        let data: Vec<BookResponse> = books.iter().map(mapper::book_response).collect();

        Ok(BookListResponse {
            total_item_count: data.len(),
            data,
        })
    }

    async fn get(&self, id: &str) -> Result<BookResponse, BookError> {
        let book = self.repository.find_by_id(id).await?;
        Ok(mapper::book_response(&book))
    }

    async fn create(&self, request: CreateBookRequest) -> Result<String, BookError> {
        validate(&request)?;

        let book = mapper::new_book(&request).assign(Uuid::now_v7().to_string(), now_millis());
        self.repository.insert(&book).await?;

        tracing::info!(book_id = %book.id, title = %book.title, "book created");
        Ok(book.id)
    }

    async fn update(&self, request: UpdateBookRequest) -> Result<bool, BookError> {
        validate(&request)?;

        let existing = self.repository.find_by_id(&request.id).await?;
        let mut book = mapper::book_from_update(&request, &existing);
        book.touch(now_millis());
        self.repository.update(&book).await?;

        tracing::info!(book_id = %book.id, "book updated");
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool, BookError> {
        self.repository.delete(id).await?;

        tracing::info!(book_id = %id, "book deleted");
        Ok(true)
    }
}
