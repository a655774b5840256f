use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Meal slot a food entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "meal_period", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MealPeriod {
    #[serde(alias = "Morning")]
    Morning,
    #[serde(alias = "Lunch")]
    Lunch,
    #[serde(alias = "Afternoon")]
    Afternoon,
    #[serde(alias = "Dinner")]
    Dinner,
}

impl MealPeriod {
    /// Display order on the tracker page.
    pub const ALL: [MealPeriod; 4] = [
        MealPeriod::Morning,
        MealPeriod::Lunch,
        MealPeriod::Afternoon,
        MealPeriod::Dinner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealPeriod::Morning => "morning",
            MealPeriod::Lunch => "lunch",
            MealPeriod::Afternoon => "afternoon",
            MealPeriod::Dinner => "dinner",
        }
    }
}

impl std::fmt::Display for MealPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of a food was eaten. Exactly one of `grams`/`unit` is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quantity {
    Grams(i32),
    Unit(String),
}

impl Quantity {
    pub fn grams(&self) -> Option<i32> {
        match self {
            Quantity::Grams(g) => Some(*g),
            Quantity::Unit(_) => None,
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            Quantity::Unit(u) => Some(u),
            Quantity::Grams(_) => None,
        }
    }
}

/// Row of the `food_items` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub grams: Option<i32>,
    pub unit: Option<String>,
    pub period: MealPeriod,
    pub is_completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewFood {
    pub name: String,
    pub quantity: Quantity,
    pub period: MealPeriod,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct FoodPatch {
    pub name: Option<String>,
    pub quantity: Option<Quantity>,
}
