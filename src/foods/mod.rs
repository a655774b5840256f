mod dto;
mod handlers;
pub mod repo;
mod repo_types;
mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::{FoodRepo, PgFoodRepo};
pub use repo_types::{FoodItem, MealPeriod};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
