use serde::{Deserialize, Serialize};

use super::repo_types::{Season, SeasonType};

#[derive(Debug, Deserialize)]
pub struct StartSeasonRequest {
    #[serde(rename = "type")]
    pub kind: SeasonType,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct EndSeasonRequest {
    #[serde(rename = "type")]
    pub kind: SeasonType,
}

#[derive(Debug, Serialize)]
pub struct SeasonsResponse {
    pub seasons: Vec<Season>,
}
