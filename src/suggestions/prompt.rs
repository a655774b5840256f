use anyhow::Context;
use serde::Deserialize;
use serde_json::json;

use super::dto::FoodSuggestion;
use crate::foods::MealPeriod;

/// Shape the model is asked to reply with.
fn reply_schema() -> serde_json::Value {
    json!({
        "$defs": {
            "Ingredient": {
                "properties": {
                    "foodName": { "title": "Food Name", "type": "string" },
                    "amount": { "title": "Amount", "type": "string" },
                    "macronutrients": { "title": "Macronutrients", "type": "string" },
                    "grams": { "title": "Grams", "type": "string" }
                },
                "required": ["foodName", "amount", "grams"],
                "title": "Ingredient",
                "type": "object"
            }
        },
        "properties": {
            "ingredients": {
                "items": { "$ref": "#/$defs/Ingredient" },
                "title": "Ingredients",
                "type": "array"
            }
        },
        "required": ["ingredients"],
        "title": "Recipe",
        "type": "object"
    })
}

pub fn system_prompt(period: MealPeriod) -> String {
    let schema = serde_json::to_string_pretty(&reply_schema()).unwrap_or_default();
    format!(
        "You are a helpful nutritionist assistant. Knowing it's {period}, provide food \
         combinations based on macronutrient requirements thinking about cheap, easy to \
         prepare and affordable food.\n\
         Do not suggest oil.\n\
         Pay attention to returning the correct amount of fat, protein and carbs.\n\
         The JSON object must use the schema: {schema}"
    )
}

fn target(grams: i32) -> String {
    if grams > 0 {
        format!("{grams}g")
    } else {
        "any amount".to_string()
    }
}

pub fn user_prompt(carbs: i32, protein: i32, fat: i32) -> String {
    format!(
        "{} of carbohydrates, {} of protein, and {} of fat.",
        target(carbs),
        target(protein),
        target(fat)
    )
}

#[derive(Deserialize)]
struct Reply {
    ingredients: Vec<FoodSuggestion>,
}

/// Parse the model's message content into suggestions.
///
/// Reasoning models sometimes wrap the object in prose or `<think>` blocks, so
/// only the outermost `{ ... }` span is parsed.
pub fn parse_reply(content: &str) -> anyhow::Result<Vec<FoodSuggestion>> {
    let start = content.find('{').context("reply has no JSON object")?;
    let end = content.rfind('}').context("reply has no JSON object")?;
    anyhow::ensure!(end > start, "reply has no JSON object");

    let reply: Reply =
        serde_json::from_str(&content[start..=end]).context("reply does not match schema")?;
    Ok(reply.ingredients)
}
