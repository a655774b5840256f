mod dto;
mod handlers;
pub mod repo;
mod repo_types;

use crate::state::AppState;
use axum::Router;
use time::Date;

pub use repo::{PgSeasonRepo, SeasonRepo};
pub use repo_types::Season;

time::serde::format_description!(date_format, Date, "[year]-[month]-[day]");

pub fn router() -> Router<AppState> {
    handlers::routes()
}
