use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{dto::BookInput, repo_types::Book};
use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    extract::{JsonBody, PathParam},
    state::AppState,
};

pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/:id", get(get_book).put(update_book).delete(delete_book))
}

#[instrument(skip_all)]
pub async fn list_books(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(state.books.list().await?))
}

#[instrument(skip(state, _user))]
pub async fn get_book(
    State(state): State<AppState>,
    _user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<Book>, AppError> {
    state
        .books
        .get(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("book"))
}

#[instrument(skip_all)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    JsonBody(body): JsonBody<BookInput>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Book>), AppError> {
    body.validate()?;
    let book = state.books.create(body).await?;
    info!(book_id = %book.id, user_id = %claims.sub, "book created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/books/{}", book.id))],
        Json(book),
    ))
}

#[instrument(skip(state, claims, body))]
pub async fn update_book(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(body): JsonBody<BookInput>,
) -> Result<Json<Book>, AppError> {
    body.validate()?;
    let book = state
        .books
        .update(id, body)
        .await?
        .ok_or(AppError::NotFound("book"))?;
    info!(book_id = %id, user_id = %claims.sub, "book updated");
    Ok(Json(book))
}

#[instrument(skip(state, claims))]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.books.delete(id).await? {
        return Err(AppError::NotFound("book"));
    }
    info!(book_id = %id, user_id = %claims.sub, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
