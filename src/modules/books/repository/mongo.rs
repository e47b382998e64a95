use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, DateTime, Document},
    Collection,
};
use serde::{Deserialize, Serialize};
use shelf_db::DocumentStore;
use time::OffsetDateTime;

use super::{bounded, BookRepository};
use crate::modules::books::error::BookError;
use crate::modules::books::models::Book;

const NANOS_PER_MILLI: i128 = 1_000_000;

/// Persisted shape of a book. The identifier doubles as `_id`, so the
/// collection's primary index keeps identifiers unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub quantity: i64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn to_bson_datetime(at: OffsetDateTime) -> DateTime {
    let millis = at.unix_timestamp_nanos() / NANOS_PER_MILLI;
    DateTime::from_millis(millis as i64)
}

fn from_bson_datetime(at: DateTime) -> Result<OffsetDateTime, BookError> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(at.timestamp_millis()) * NANOS_PER_MILLI)
        .map_err(|e| BookError::storage(format!("stored timestamp out of range: {e}")))
}

impl From<&Book> for BookDocument {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            quantity: book.quantity,
            created_at: to_bson_datetime(book.created_at),
            updated_at: to_bson_datetime(book.updated_at),
        }
    }
}

impl TryFrom<BookDocument> for Book {
    type Error = BookError;

    fn try_from(document: BookDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: document.id,
            title: document.title,
            author: document.author,
            quantity: document.quantity,
            created_at: from_bson_datetime(document.created_at)?,
            updated_at: from_bson_datetime(document.updated_at)?,
        })
    }
}

impl From<mongodb::error::Error> for BookError {
    fn from(error: mongodb::error::Error) -> Self {
        BookError::storage(error)
    }
}

/// Update pipeline for [`MongoBookRepository::update`].
///
/// The server computes `updated_at` from the stored value, so concurrent writers
/// always advance it. Client text goes through `$literal` because a leading `$`
/// would otherwise read as a field path.
fn update_pipeline(book: &Book) -> Vec<Document> {
    vec![doc! {
        "$set": {
            "title": { "$literal": book.title.as_str() },
            "author": { "$literal": book.author.as_str() },
            "quantity": { "$literal": book.quantity },
            "updated_at": {
                "$max": [
                    to_bson_datetime(book.updated_at),
                    { "$add": ["$updated_at", 1_i64] }
                ]
            },
        }
    }]
}

/// Book repository backed by a single MongoDB collection.
#[derive(Clone, Debug)]
pub struct MongoBookRepository {
    collection: Collection<BookDocument>,
    timeout: Duration,
}

impl MongoBookRepository {
    pub fn new(store: &DocumentStore, collection: &str, timeout: Duration) -> Self {
        Self {
            collection: store.collection::<BookDocument>(collection),
            timeout,
        }
    }

    async fn insert_document(&self, document: BookDocument) -> Result<(), BookError> {
        let result = self.collection.insert_one(&document).await?;
        match result.inserted_id {
            Bson::String(ref id) if *id == document.id => Ok(()),
            other => Err(BookError::storage(format!(
                "insert of '{}' acknowledged with unexpected id {other}",
                document.id
            ))),
        }
    }

    async fn load_all(&self) -> Result<Vec<Book>, BookError> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<BookDocument> = cursor.try_collect().await?;
        documents.into_iter().map(Book::try_from).collect()
    }

    async fn load_one(&self, id: &str) -> Result<Book, BookError> {
        match self.collection.find_one(doc! { "_id": id }).await? {
            Some(document) => Book::try_from(document),
            None => Err(BookError::not_found(id)),
        }
    }

    async fn replace_fields(&self, book: &Book) -> Result<(), BookError> {
        let filter = doc! { "_id": book.id.as_str() };
        let result = self
            .collection
            .update_one(filter, update_pipeline(book))
            .await?;
        if result.matched_count == 0 {
            return Err(BookError::not_found(&book.id));
        }
        if result.modified_count == 0 {
            return Err(BookError::storage(format!(
                "update of '{}' modified no documents",
                book.id
            )));
        }
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), BookError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count == 0 {
            return Err(BookError::not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl BookRepository for MongoBookRepository {
    async fn insert(&self, book: &Book) -> Result<(), BookError> {
        bounded("insert", self.timeout, self.insert_document(BookDocument::from(book))).await
    }

    async fn find_all(&self) -> Result<Vec<Book>, BookError> {
        bounded("find_all", self.timeout, self.load_all()).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Book, BookError> {
        bounded("find_by_id", self.timeout, self.load_one(id)).await
    }

    async fn update(&self, book: &Book) -> Result<(), BookError> {
        bounded("update", self.timeout, self.replace_fields(book)).await
    }

    async fn delete(&self, id: &str) -> Result<(), BookError> {
        bounded("delete", self.timeout, self.remove(id)).await
    }
}
