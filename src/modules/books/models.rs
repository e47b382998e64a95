use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Domain entity for a catalogued book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Unique identifier, assigned once at creation
    pub id: String,
    pub title: String,
    pub author: String,
    /// Copies on hand; never negative
    pub quantity: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Book {
    /// Refresh `updated_at`, keeping it strictly ahead of its previous value.
    pub fn touch(&mut self, now: OffsetDateTime) {
        let next = self.updated_at + Duration::milliseconds(1);
        self.updated_at = now.max(next);
    }
}

/// A book that has passed validation but has no identity yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub quantity: i64,
}

impl NewBook {
    /// Give the book its identifier and creation timestamp.
    pub fn assign(self, id: String, at: OffsetDateTime) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            quantity: self.quantity,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Current UTC time truncated to whole milliseconds, the resolution of stored dates.
pub fn now_millis() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(u32::from(now.millisecond()) * 1_000_000)
        .unwrap_or(now)
}

/// Request model for creating a new book.
///
/// Absent fields decode to empty values so they are reported by validation
/// instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBookRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// Request model for replacing an existing book.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// Wire representation of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub quantity: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Listing envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookListResponse {
    pub total_item_count: usize,
    pub data: Vec<BookResponse>,
}

/// Outcome of a create, update or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub id: String,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> Book {
        NewBook {
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            quantity: 3,
        }
        .assign("book-1".to_string(), datetime!(2024-05-01 10:00:00 UTC))
    }

    #[test]
    fn assign_sets_equal_timestamps() {
        let book = sample();
        assert_eq!(book.id, "book-1");
        assert_eq!(book.created_at, book.updated_at);
    }

    #[test]
    fn touch_moves_forward_to_now() {
        let mut book = sample();
        book.touch(datetime!(2024-05-02 09:30:00 UTC));
        assert_eq!(book.updated_at, datetime!(2024-05-02 09:30:00 UTC));
        assert_eq!(book.created_at, datetime!(2024-05-01 10:00:00 UTC));
    }

    #[test]
    fn touch_is_strict_even_when_clock_stalls() {
        let mut book = sample();
        let before = book.updated_at;
        book.touch(before);
        assert!(book.updated_at > before);

        // a clock running behind never moves the timestamp backwards
        let current = book.updated_at;
        book.touch(datetime!(2020-01-01 00:00:00 UTC));
        assert!(book.updated_at > current);
    }

    #[test]
    fn now_millis_drops_sub_millisecond_precision() {
        assert_eq!(now_millis().nanosecond() % 1_000_000, 0);
    }

    #[test]
    fn create_request_tolerates_missing_fields() {
        let request: CreateBookRequest = serde_json::from_str(r#"{"title": "Dune"}"#).unwrap();
        assert_eq!(request.title, "Dune");
        assert_eq!(request.author, "");
        assert_eq!(request.quantity, None);
    }

    #[test]
    fn response_encodes_rfc3339_timestamps() {
        let book = sample();
        let response = BookResponse {
            id: book.id,
            title: book.title,
            author: book.author,
            quantity: book.quantity,
            created_at: book.created_at,
            updated_at: book.updated_at,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["created_at"], "2024-05-01T10:00:00Z");
        assert_eq!(json["quantity"], 3);
    }
}
