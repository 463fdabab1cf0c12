use sqlx::FromRow;
use uuid::Uuid;

use super::lookup::FoodItem;
use crate::nutrients::aggregate::NutrientValues;

/// Nutrient columns shared by `food_items` selects. NULL reads as 0.
#[derive(Debug, Clone, Default, FromRow)]
pub struct FoodNutrientColumns {
    pub fat: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub trans_fat: Option<f64>,
    pub cholesterol: Option<f64>,
    pub sodium: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub fiber: Option<f64>,
    pub sugars: Option<f64>,
    pub protein: Option<f64>,
    pub calcium: Option<f64>,
    pub iron: Option<f64>,
    pub potassium: Option<f64>,
    pub magnesium: Option<f64>,
    pub phosphorus: Option<f64>,
    pub zinc: Option<f64>,
    pub calories: Option<f64>,
    pub vitamin_c: Option<f64>,
    pub vitamin_d: Option<f64>,
}

impl From<FoodNutrientColumns> for NutrientValues {
    fn from(c: FoodNutrientColumns) -> Self {
        Self {
            fat: c.fat.unwrap_or(0.0),
            saturated_fat: c.saturated_fat.unwrap_or(0.0),
            trans_fat: c.trans_fat.unwrap_or(0.0),
            cholesterol: c.cholesterol.unwrap_or(0.0),
            sodium: c.sodium.unwrap_or(0.0),
            carbohydrates: c.carbohydrates.unwrap_or(0.0),
            fiber: c.fiber.unwrap_or(0.0),
            sugars: c.sugars.unwrap_or(0.0),
            protein: c.protein.unwrap_or(0.0),
            calcium: c.calcium.unwrap_or(0.0),
            iron: c.iron.unwrap_or(0.0),
            potassium: c.potassium.unwrap_or(0.0),
            magnesium: c.magnesium.unwrap_or(0.0),
            phosphorus: c.phosphorus.unwrap_or(0.0),
            zinc: c.zinc.unwrap_or(0.0),
            calories: c.calories.unwrap_or(0.0),
            vitamin_c: c.vitamin_c.unwrap_or(0.0),
            vitamin_d: c.vitamin_d.unwrap_or(0.0),
        }
    }
}

/// Catalog row in `food_items`.
#[derive(Debug, Clone, FromRow)]
pub struct FoodItemRow {
    pub id: Uuid,
    pub fdc_id: i64,
    pub name: String,
    #[sqlx(flatten)]
    pub nutrients: FoodNutrientColumns,
}

impl From<FoodItemRow> for FoodItem {
    fn from(row: FoodItemRow) -> Self {
        Self {
            fdc_id: row.fdc_id,
            name: row.name,
            nutrients: row.nutrients.into(),
        }
    }
}

#[cfg(test)]
mod repo_types_tests {
    use super::*;

    #[test]
    fn null_columns_read_as_zero() {
        let cols = FoodNutrientColumns {
            sodium: Some(140.0),
            vitamin_c: Some(8.4),
            ..Default::default()
        };
        let values = NutrientValues::from(cols);
        assert_eq!(values.sodium, 140.0);
        assert_eq!(values.vitamin_c, 8.4);
        assert_eq!(values.fat, 0.0);
        assert_eq!(values.calories, 0.0);
    }
}
