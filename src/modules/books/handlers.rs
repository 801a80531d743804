use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use bookshelf_authz::Principal;
use bookshelf_db::{Book, BookPatch, Store, StoreError};
use bookshelf_http::error::AppError;

use super::filters::ListQueryResolver;
use super::models::{current_year, unknown_author, BookPayload};
use crate::query::pagination::{paginate, Page};
use crate::query::QueryParams;

const LIST_PATH: &str = "/api/books";

#[derive(Clone)]
pub struct BooksState {
    pub store: Store,
    pub page_size: usize,
}

/// Unknown authors on a book write are a problem with the `author` field.
fn author_field_error(err: StoreError) -> AppError {
    match err {
        StoreError::AuthorNotFound(id) => AppError::fields(vec![unknown_author(id)]),
        other => other.into(),
    }
}

pub async fn health_check() -> &'static str {
    "books module is healthy"
}

/// GET /api/books
pub async fn list_books(
    State(state): State<BooksState>,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<Page<Book>>, AppError> {
    let Query(params) = query?;
    let resolver = ListQueryResolver::from_params(&params)?;

    let rows = resolver.resolve(state.store.list_books().await);
    let page = paginate(rows, &params, state.page_size, LIST_PATH)?;

    Ok(Json(page.map(|row| row.book)))
}

/// GET /api/books/{id}
pub async fn get_book(
    State(state): State<BooksState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = path?;
    Ok(Json(state.store.get_book(id).await?))
}

/// POST /api/books/create
pub async fn create_book(
    State(state): State<BooksState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(payload) = payload?;
    let new_book = payload
        .into_new_book(current_year())
        .map_err(AppError::fields)?;

    let book = state
        .store
        .create_book(new_book)
        .await
        .map_err(author_field_error)?;

    tracing::info!(book_id = book.id, user = %principal.username, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /api/books/update/{id}
pub async fn replace_book(
    State(state): State<BooksState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = path?;
    state.store.get_book(id).await?;

    let Json(payload) = payload?;
    let patch = payload
        .into_new_book(current_year())
        .map(BookPatch::from)
        .map_err(AppError::fields)?;

    apply_update(&state, &principal, id, patch).await
}

/// PATCH /api/books/update/{id}
pub async fn patch_book(
    State(state): State<BooksState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = path?;
    state.store.get_book(id).await?;

    let Json(payload) = payload?;
    let patch = payload
        .into_patch(current_year())
        .map_err(AppError::fields)?;

    apply_update(&state, &principal, id, patch).await
}

async fn apply_update(
    state: &BooksState,
    principal: &Principal,
    id: u64,
    patch: BookPatch,
) -> Result<Json<Book>, AppError> {
    let book = state
        .store
        .update_book(id, patch)
        .await
        .map_err(author_field_error)?;

    tracing::info!(book_id = book.id, user = %principal.username, "book updated");
    Ok(Json(book))
}

/// DELETE /api/books/delete/{id}
pub async fn delete_book(
    State(state): State<BooksState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    state.store.delete_book(id).await?;

    tracing::info!(book_id = id, user = %principal.username, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
