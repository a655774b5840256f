use super::{
    dto::{CreateFoodRequest, UpdateFoodRequest},
    repo_types::{FoodPatch, MealPeriod, NewFood, Quantity},
};
use crate::{error::AppError, suggestions::FoodSuggestion};

fn clean(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn quantity(grams: Option<i32>, unit: Option<String>) -> Result<Option<Quantity>, AppError> {
    match (grams, clean(unit)) {
        (Some(_), Some(_)) => Err(AppError::BadRequest(
            "Give either grams or unit, not both".into(),
        )),
        (Some(g), None) if g <= 0 => Err(AppError::BadRequest("Grams must be positive".into())),
        (Some(g), None) => Ok(Some(Quantity::Grams(g))),
        (None, Some(u)) => Ok(Some(Quantity::Unit(u))),
        (None, None) => Ok(None),
    }
}

pub fn validate_new(req: CreateFoodRequest) -> Result<NewFood, AppError> {
    let name = clean(Some(req.name)).ok_or_else(|| AppError::BadRequest("Name is required".into()))?;
    let quantity = quantity(req.grams, req.unit)?
        .ok_or_else(|| AppError::BadRequest("Grams or unit is required".into()))?;
    Ok(NewFood {
        name,
        quantity,
        period: req.period,
    })
}

pub fn validate_patch(req: UpdateFoodRequest) -> Result<FoodPatch, AppError> {
    let name = match req.name {
        Some(n) => Some(clean(Some(n)).ok_or_else(|| AppError::BadRequest("Name cannot be empty".into()))?),
        None => None,
    };
    Ok(FoodPatch {
        name,
        quantity: quantity(req.grams, req.unit)?,
    })
}

/// Read the leading number of a free-text gram amount ("150", "150 g", "150.5g").
/// Fractions are truncated.
pub fn parse_grams(raw: &str) -> Option<i32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<i32>().ok().filter(|g| *g > 0)
}

pub fn from_suggestion(s: FoodSuggestion, period: MealPeriod) -> Result<NewFood, AppError> {
    let name = clean(Some(s.food_name))
        .ok_or_else(|| AppError::BadRequest("Suggestion has no food name".into()))?;
    let quantity = match parse_grams(&s.grams) {
        Some(g) => Quantity::Grams(g),
        None => clean(Some(s.amount))
            .map(Quantity::Unit)
            .ok_or_else(|| AppError::BadRequest("Suggestion has no usable amount".into()))?,
    };
    Ok(NewFood {
        name,
        quantity,
        period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, grams: Option<i32>, unit: Option<&str>) -> CreateFoodRequest {
        CreateFoodRequest {
            name: name.into(),
            grams,
            unit: unit.map(str::to_string),
            period: MealPeriod::Morning,
        }
    }

    #[test]
    fn new_food_needs_name_and_one_quantity() {
        assert!(validate_new(create("  ", Some(100), None)).is_err());
        assert!(validate_new(create("Oats", None, None)).is_err());
        assert!(validate_new(create("Oats", None, Some("  "))).is_err());
        assert!(validate_new(create("Oats", Some(80), Some("1 cup"))).is_err());
        assert!(validate_new(create("Oats", Some(0), None)).is_err());

        let ok = validate_new(create(" Oats ", Some(80), None)).unwrap();
        assert_eq!(ok.name, "Oats");
        assert_eq!(ok.quantity, Quantity::Grams(80));

        let ok = validate_new(create("Egg", None, Some("2"))).unwrap();
        assert_eq!(ok.quantity, Quantity::Unit("2".into()));
    }

    #[test]
    fn patch_rejects_blank_name_and_double_quantity() {
        let blank = UpdateFoodRequest {
            name: Some(" ".into()),
            ..Default::default()
        };
        assert!(validate_patch(blank).is_err());

        let both = UpdateFoodRequest {
            grams: Some(10),
            unit: Some("1".into()),
            ..Default::default()
        };
        assert!(validate_patch(both).is_err());

        let empty = validate_patch(UpdateFoodRequest::default()).unwrap();
        assert!(empty.name.is_none() && empty.quantity.is_none());
    }

    #[test]
    fn grams_are_read_leniently() {
        assert_eq!(parse_grams("150"), Some(150));
        assert_eq!(parse_grams(" 150g"), Some(150));
        assert_eq!(parse_grams("150.5 g"), Some(150));
        assert_eq!(parse_grams("about 100g"), None);
        assert_eq!(parse_grams("0"), None);
        assert_eq!(parse_grams(""), None);
    }

    #[test]
    fn suggestion_falls_back_to_amount_as_unit() {
        let s = FoodSuggestion {
            food_name: "Banana".into(),
            amount: "1 medium".into(),
            grams: "n/a".into(),
            macronutrients: None,
        };
        let food = from_suggestion(s, MealPeriod::Afternoon).unwrap();
        assert_eq!(food.quantity, Quantity::Unit("1 medium".into()));
        assert_eq!(food.period, MealPeriod::Afternoon);
    }
}
