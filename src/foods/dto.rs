use serde::Deserialize;

use super::repo_types::MealPeriod;
use crate::suggestions::FoodSuggestion;

#[derive(Debug, Deserialize)]
pub struct CreateFoodRequest {
    pub name: String,
    pub grams: Option<i32>,
    pub unit: Option<String>,
    pub period: MealPeriod,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateFoodRequest {
    pub name: Option<String>,
    pub grams: Option<i32>,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub period: Option<MealPeriod>,
}

#[derive(Debug, Deserialize)]
pub struct FromSuggestionRequest {
    pub suggestion: FoodSuggestion,
    pub period: MealPeriod,
}
