use std::fmt;

use serde::{Deserialize, Serialize};

/// Every nutrient tracked by the dashboard.
///
/// Variant order is the baseline table order; ranking ties fall back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NutrientKey {
    Fat,
    SaturatedFat,
    TransFat,
    Cholesterol,
    Sodium,
    Carbohydrates,
    Fiber,
    Sugars,
    Protein,
    Calcium,
    Iron,
    Potassium,
    Magnesium,
    Phosphorus,
    Zinc,
    Calories,
    VitaminC,
    VitaminD,
}

impl NutrientKey {
    pub const COUNT: usize = 18;

    pub const ALL: [NutrientKey; Self::COUNT] = [
        NutrientKey::Fat,
        NutrientKey::SaturatedFat,
        NutrientKey::TransFat,
        NutrientKey::Cholesterol,
        NutrientKey::Sodium,
        NutrientKey::Carbohydrates,
        NutrientKey::Fiber,
        NutrientKey::Sugars,
        NutrientKey::Protein,
        NutrientKey::Calcium,
        NutrientKey::Iron,
        NutrientKey::Potassium,
        NutrientKey::Magnesium,
        NutrientKey::Phosphorus,
        NutrientKey::Zinc,
        NutrientKey::Calories,
        NutrientKey::VitaminC,
        NutrientKey::VitaminD,
    ];

    /// Position in `ALL`, used to index fixed-size tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            NutrientKey::Fat => "fat",
            NutrientKey::SaturatedFat => "saturatedFat",
            NutrientKey::TransFat => "transFat",
            NutrientKey::Cholesterol => "cholesterol",
            NutrientKey::Sodium => "sodium",
            NutrientKey::Carbohydrates => "carbohydrates",
            NutrientKey::Fiber => "fiber",
            NutrientKey::Sugars => "sugars",
            NutrientKey::Protein => "protein",
            NutrientKey::Calcium => "calcium",
            NutrientKey::Iron => "iron",
            NutrientKey::Potassium => "potassium",
            NutrientKey::Magnesium => "magnesium",
            NutrientKey::Phosphorus => "phosphorus",
            NutrientKey::Zinc => "zinc",
            NutrientKey::Calories => "calories",
            NutrientKey::VitaminC => "vitaminC",
            NutrientKey::VitaminD => "vitaminD",
        }
    }
}

impl fmt::Display for NutrientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod key_tests {
    use super::*;

    #[test]
    fn all_is_in_declaration_order() {
        for (i, key) in NutrientKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn serde_name_matches_as_str() {
        for key in NutrientKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
        let parsed: NutrientKey = serde_json::from_str("\"vitaminC\"").unwrap();
        assert_eq!(parsed, NutrientKey::VitaminC);
    }
}
