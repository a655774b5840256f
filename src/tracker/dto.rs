use serde::Serialize;

use crate::{
    foods::{FoodItem, MealPeriod},
    seasons::Season,
};

#[derive(Debug, Serialize)]
pub struct PeriodFoods {
    pub period: MealPeriod,
    pub items: Vec<FoodItem>,
}

/// Everything the tracker page renders on first load.
#[derive(Debug, Serialize)]
pub struct TrackerView {
    pub user_email: String,
    pub periods: Vec<PeriodFoods>,
    pub open_seasons: Vec<Season>,
}
