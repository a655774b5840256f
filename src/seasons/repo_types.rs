use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "season_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SeasonType {
    Cutting,
    Bulking,
}

impl std::fmt::Display for SeasonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SeasonType::Cutting => "cutting",
            SeasonType::Bulking => "bulking",
        })
    }
}

/// Row of the `seasons` table. Open while `ended_at` is null.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Season {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: SeasonType,
    #[serde(with = "crate::seasons::date_format")]
    pub started_at: Date,
    #[serde(with = "crate::seasons::date_format::option")]
    pub ended_at: Option<Date>,
}

impl Season {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// Outcome of inserting a season.
#[derive(Debug)]
pub enum StartOutcome {
    Started(Season),
    AlreadyOpen,
}
