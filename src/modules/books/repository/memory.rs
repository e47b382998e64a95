use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use time::Duration;

use super::BookRepository;
use crate::modules::books::error::BookError;
use crate::modules::books::models::Book;

/// Process-local book store.
///
/// Iterates in identifier order, which for time-ordered identifiers is
/// creation order. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: RwLock<BTreeMap<String, Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.read().is_empty()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn insert(&self, book: &Book) -> Result<(), BookError> {
        let mut books = self.books.write();
        if books.contains_key(&book.id) {
            return Err(BookError::storage(format!(
                "duplicate book identifier '{}'",
                book.id
            )));
        }
        books.insert(book.id.clone(), book.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Book>, BookError> {
        Ok(self.books.read().values().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Book, BookError> {
        self.books
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| BookError::not_found(id))
    }

    async fn update(&self, book: &Book) -> Result<(), BookError> {
        let mut books = self.books.write();
        let stored = books
            .get_mut(&book.id)
            .ok_or_else(|| BookError::not_found(&book.id))?;

        stored.title = book.title.clone();
        stored.author = book.author.clone();
        stored.quantity = book.quantity;
        // bumped under the write lock so racing writers still advance it
        stored.updated_at = book
            .updated_at
            .max(stored.updated_at + Duration::milliseconds(1));
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), BookError> {
        self.books
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| BookError::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn book(id: &str, title: &str) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: "Herbert".to_string(),
            quantity: 1,
            created_at: datetime!(2024-01-01 00:00:00 UTC),
            updated_at: datetime!(2024-01-01 00:00:00 UTC),
        }
    }

    #[tokio::test]
    async fn insert_then_find() {
        let repository = InMemoryBookRepository::new();
        repository.insert(&book("a", "Dune")).await.unwrap();

        let found = repository.find_by_id("a").await.unwrap();
        assert_eq!(found, book("a", "Dune"));
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_identifier_is_a_storage_error() {
        let repository = InMemoryBookRepository::new();
        repository.insert(&book("a", "Dune")).await.unwrap();

        let error = repository.insert(&book("a", "Emma")).await.unwrap_err();
        assert!(matches!(error, BookError::Storage { .. }));
        assert_eq!(repository.find_by_id("a").await.unwrap().title, "Dune");
    }

    #[tokio::test]
    async fn find_all_iterates_in_identifier_order() {
        let repository = InMemoryBookRepository::new();
        assert!(repository.find_all().await.unwrap().is_empty());

        repository.insert(&book("b", "Emma")).await.unwrap();
        repository.insert(&book("a", "Dune")).await.unwrap();

        let ids: Vec<String> = repository
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn update_overwrites_mutable_fields_only() {
        let repository = InMemoryBookRepository::new();
        repository.insert(&book("a", "Dune")).await.unwrap();

        let mut changed = book("a", "Dune Messiah");
        changed.quantity = 9;
        changed.created_at = datetime!(1999-01-01 00:00:00 UTC);
        changed.updated_at = datetime!(2024-03-01 00:00:00 UTC);
        repository.update(&changed).await.unwrap();

        let stored = repository.find_by_id("a").await.unwrap();
        assert_eq!(stored.title, "Dune Messiah");
        assert_eq!(stored.quantity, 9);
        assert_eq!(stored.created_at, datetime!(2024-01-01 00:00:00 UTC));
        assert_eq!(stored.updated_at, datetime!(2024-03-01 00:00:00 UTC));
    }

    #[tokio::test]
    async fn update_with_stale_timestamp_still_advances() {
        let repository = InMemoryBookRepository::new();
        repository.insert(&book("a", "Dune")).await.unwrap();

        let stale = book("a", "Dune");
        repository.update(&stale).await.unwrap();
        let first = repository.find_by_id("a").await.unwrap().updated_at;
        repository.update(&stale).await.unwrap();
        let second = repository.find_by_id("a").await.unwrap().updated_at;

        assert_eq!(first, datetime!(2024-01-01 00:00:00.001 UTC));
        assert_eq!(second, datetime!(2024-01-01 00:00:00.002 UTC));
    }

    #[tokio::test]
    async fn update_never_inserts() {
        let repository = InMemoryBookRepository::new();
        let error = repository.update(&book("ghost", "Dune")).await.unwrap_err();
        assert!(matches!(error, BookError::NotFound { id } if id == "ghost"));
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn missing_identifiers_are_not_found() {
        let repository = InMemoryBookRepository::new();
        assert!(matches!(
            repository.find_by_id("nope").await,
            Err(BookError::NotFound { .. })
        ));
        assert!(matches!(
            repository.delete("nope").await,
            Err(BookError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_removes_the_book() {
        let repository = InMemoryBookRepository::new();
        repository.insert(&book("a", "Dune")).await.unwrap();
        repository.delete("a").await.unwrap();
        assert!(repository.is_empty());
    }
}
