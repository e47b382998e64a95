//! HTTP handlers for the books resource.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shelf_http::error::AppError;

use super::models::{
    BookListResponse, BookResponse, CreateBookRequest, MutationResponse, UpdateBookRequest,
};
use super::service::BookService;

type SharedService = Arc<dyn BookService>;

/// Routes relative to the module mount point.
pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book).put(update_book))
        .route("/health", get(health_check))
        .route("/{id}", get(get_book).delete(delete_book))
        .with_state(service)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(
    State(service): State<SharedService>,
) -> Result<Json<BookListResponse>, AppError> {
    Ok(Json(service.list().await?))
}

async fn get_book(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, AppError> {
    Ok(Json(service.get(&id).await?))
}

async fn create_book(
    State(service): State<SharedService>,
    payload: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MutationResponse>), AppError> {
    let Json(request) = payload.map_err(reject_body)?;
    let id = service.create(request).await?;

    Ok((StatusCode::CREATED, Json(MutationResponse { id, success: true })))
}

async fn update_book(
    State(service): State<SharedService>,
    payload: Result<Json<UpdateBookRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let Json(request) = payload.map_err(reject_body)?;
    let id = request.id.clone();
    let success = service.update(request).await?;

    Ok(Json(MutationResponse { id, success }))
}

async fn delete_book(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let success = service.delete(&id).await?;
    Ok(Json(MutationResponse { id, success }))
}

fn reject_body(rejection: JsonRejection) -> AppError {
    AppError::bad_request(format!("request body could not be decoded: {}", rejection.body_text()))
}
