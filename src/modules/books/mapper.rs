//! Conversions between wire requests/responses and the [`Book`] entity.
//!
//! Requests reach these functions only after validation.

use super::models::{Book, BookResponse, CreateBookRequest, NewBook, UpdateBookRequest};

pub fn new_book(request: &CreateBookRequest) -> NewBook {
    NewBook {
        title: request.title.clone(),
        author: request.author.clone(),
        quantity: request.quantity.unwrap_or_default(),
    }
}

pub fn book_response(book: &Book) -> BookResponse {
    BookResponse {
        id: book.id.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        quantity: book.quantity,
        created_at: book.created_at,
        updated_at: book.updated_at,
    }
}

/// Full replacement of the mutable fields; timestamps are carried over from `existing`.
pub fn book_from_update(request: &UpdateBookRequest, existing: &Book) -> Book {
    Book {
        id: request.id.clone(),
        title: request.title.clone(),
        author: request.author.clone(),
        quantity: request.quantity.unwrap_or_default(),
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    }
}
