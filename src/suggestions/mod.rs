pub mod client;
pub mod dto;
mod handlers;
mod prompt;

use crate::state::AppState;
use axum::Router;

pub use client::{ChatCompletionClient, SuggestionClient};
pub use dto::FoodSuggestion;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
