use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use bookshelf_authz::Principal;
use bookshelf_db::Store;
use bookshelf_http::error::AppError;

use super::filters::resolve_authors;
use super::models::{AuthorPayload, AuthorResponse};
use crate::modules::books::models::current_year;
use crate::query::pagination::{paginate, Page};
use crate::query::QueryParams;

const LIST_PATH: &str = "/api/authors";

#[derive(Clone)]
pub struct AuthorsState {
    pub store: Store,
    pub page_size: usize,
}

pub async fn health_check() -> &'static str {
    "authors module is healthy"
}

/// GET /api/authors
pub async fn list_authors(
    State(state): State<AuthorsState>,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<Page<AuthorResponse>>, AppError> {
    let Query(params) = query?;
    let authors = resolve_authors(state.store.list_authors().await, &params)?;
    let page = paginate(authors, &params, state.page_size, LIST_PATH)?;
    Ok(Json(page.map(AuthorResponse::from)))
}

/// GET /api/authors/{id}
pub async fn get_author(
    State(state): State<AuthorsState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<AuthorResponse>, AppError> {
    let Path(id) = path?;
    Ok(Json(state.store.get_author(id).await?.into()))
}

/// POST /api/authors/create
///
/// Nested books are validated together with the author and stored in the
/// same write, so a rejected request leaves no partial records.
pub async fn create_author(
    State(state): State<AuthorsState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<AuthorPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthorResponse>), AppError> {
    let Json(payload) = payload?;
    let new_author = payload
        .into_new_author(current_year())
        .map_err(AppError::fields)?;

    let created = state
        .store
        .create_author(new_author.name, new_author.books)
        .await;

    tracing::info!(
        author_id = created.author.id,
        books = created.books.len(),
        user = %principal.username,
        "author created"
    );
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// PUT /api/authors/update/{id}
pub async fn replace_author(
    state: State<AuthorsState>,
    principal: Extension<Principal>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<AuthorPayload>, JsonRejection>,
) -> Result<Json<AuthorResponse>, AppError> {
    update_author(state, principal, path, payload, true).await
}

/// PATCH /api/authors/update/{id}
pub async fn patch_author(
    state: State<AuthorsState>,
    principal: Extension<Principal>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<AuthorPayload>, JsonRejection>,
) -> Result<Json<AuthorResponse>, AppError> {
    update_author(state, principal, path, payload, false).await
}

async fn update_author(
    State(state): State<AuthorsState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<AuthorPayload>, JsonRejection>,
    name_required: bool,
) -> Result<Json<AuthorResponse>, AppError> {
    let Path(id) = path?;
    let current = state.store.get_author(id).await?;

    let Json(payload) = payload?;
    let Some(name) = payload.into_name(name_required).map_err(AppError::fields)? else {
        return Ok(Json(current.into()));
    };

    let updated = state.store.rename_author(id, name).await?;
    tracing::info!(author_id = id, user = %principal.username, "author updated");
    Ok(Json(updated.into()))
}

/// DELETE /api/authors/delete/{id}
pub async fn delete_author(
    State(state): State<AuthorsState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    let removed = state.store.delete_author(id).await?;

    tracing::info!(
        author_id = id,
        cascaded_books = removed.len(),
        user = %principal.username,
        "author deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
