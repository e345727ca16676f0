use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{dto::QuoteInput, repo_types::Quote};
use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    extract::{JsonBody, PathParam},
    state::AppState,
};

pub fn quote_routes() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(list_quotes).post(create_quote))
        .route("/quotes/:id", get(get_quote).put(update_quote).delete(delete_quote))
}

#[instrument(skip_all)]
pub async fn list_quotes(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Quote>>, AppError> {
    Ok(Json(state.quotes.list().await?))
}

#[instrument(skip(state, _user))]
pub async fn get_quote(
    State(state): State<AppState>,
    _user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<Quote>, AppError> {
    state
        .quotes
        .get(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("quote"))
}

#[instrument(skip_all)]
pub async fn create_quote(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    JsonBody(body): JsonBody<QuoteInput>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Quote>), AppError> {
    body.validate()?;
    let quote = state.quotes.create(body).await?;
    info!(quote_id = %quote.id, user_id = %claims.sub, "quote created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/quotes/{}", quote.id))],
        Json(quote),
    ))
}

#[instrument(skip(state, claims, body))]
pub async fn update_quote(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(body): JsonBody<QuoteInput>,
) -> Result<Json<Quote>, AppError> {
    body.validate()?;
    let quote = state
        .quotes
        .update(id, body)
        .await?
        .ok_or(AppError::NotFound("quote"))?;
    info!(quote_id = %id, user_id = %claims.sub, "quote updated");
    Ok(Json(quote))
}

#[instrument(skip(state, claims))]
pub async fn delete_quote(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.quotes.delete(id).await? {
        return Err(AppError::NotFound("quote"));
    }
    info!(quote_id = %id, user_id = %claims.sub, "quote deleted");
    Ok(StatusCode::NO_CONTENT)
}
