//! Storage gateway for books.

mod memory;
mod mongo;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use super::error::BookError;
use super::models::Book;

pub use memory::InMemoryBookRepository;
pub use mongo::{BookDocument, MongoBookRepository};

/// Persistence operations on the book collection, keyed by identifier.
///
/// One instance is shared by every in-flight request.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Persist a new book. The identifier must not exist yet.
    async fn insert(&self, book: &Book) -> Result<(), BookError>;

    /// Every stored book, in the store's iteration order.
    async fn find_all(&self) -> Result<Vec<Book>, BookError>;

    async fn find_by_id(&self, id: &str) -> Result<Book, BookError>;

    /// Overwrite title, author and quantity of an existing book. Never inserts.
    ///
    /// The stored `updated_at` becomes the later of `book.updated_at` and its
    /// previous value plus one millisecond, decided atomically by the store.
    async fn update(&self, book: &Book) -> Result<(), BookError>;

    async fn delete(&self, id: &str) -> Result<(), BookError>;
}

/// Run a storage operation, failing with [`BookError::Timeout`] once `limit` elapses.
pub(crate) async fn bounded<T, F>(
    operation: &'static str,
    limit: Duration,
    future: F,
) -> Result<T, BookError>
where
    F: Future<Output = Result<T, BookError>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, timeout_ms = limit.as_millis() as u64, "storage operation timed out");
            Err(BookError::Timeout {
                operation,
                after: limit,
            })
        }
    }
}
