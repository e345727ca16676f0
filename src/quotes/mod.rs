mod dto;
mod handlers;
pub mod repo;
mod repo_types;

pub use dto::QuoteInput;
pub use repo::{QuoteRepo, PgQuoteRepo};
pub use repo_types::Quote;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::quote_routes()
}
