mod dto;
mod handlers;
pub mod repo;
mod repo_types;

pub use dto::BookInput;
pub use repo::{BookRepo, PgBookRepo};
pub use repo_types::Book;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::book_routes()
}
