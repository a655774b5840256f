use serde::{Deserialize, Deserializer, Serialize};

use crate::foods::MealPeriod;

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub period: MealPeriod,
    #[serde(default)]
    pub carbs: i32,
    #[serde(default)]
    pub protein: i32,
    #[serde(default)]
    pub fat: i32,
}

impl SuggestionRequest {
    /// At least one macro has a positive target.
    pub fn has_target(&self) -> bool {
        self.carbs > 0 || self.protein > 0 || self.fat > 0
    }
}

/// One food returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSuggestion {
    pub food_name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount: String,
    #[serde(deserialize_with = "string_or_number")]
    pub grams: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macronutrients: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<FoodSuggestion>,
}

/// Models do not always honour `"type": "string"` for numeric fields.
fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
