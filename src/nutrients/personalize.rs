//! Per-user daily targets derived from biometrics.
//!
//! The calorie target comes from a gender-specific linear estimate; fat,
//! saturated fat, carbohydrate, fiber and sugar targets are fractions of it,
//! protein scales with body weight. Female profiles additionally get fixed
//! mineral and vitamin C ranges.

use serde::{Deserialize, Serialize};
use time::Date;

use super::key::NutrientKey;
use super::reference::{baseline, NutrientRange, NutrientTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Single-letter code stored in the profiles table.
    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" | "m" => Some(Gender::Male),
            "F" | "f" => Some(Gender::Female),
            "O" | "o" => Some(Gender::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiometricProfile {
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub gender: Gender,
}

/// Whole years between `birthdate` and `on`; zero if `on` precedes it.
pub fn age_on(birthdate: Date, on: Date) -> u32 {
    let mut years = on.year() - birthdate.year();
    if (on.month() as u8, on.day()) < (birthdate.month() as u8, birthdate.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

pub fn calorie_target(profile: &BiometricProfile) -> f64 {
    let age = f64::from(profile.age);
    let weight = profile.weight_kg;
    let height_m = profile.height_cm / 100.0;
    match profile.gender {
        Gender::Female => 387.0 - 7.31 * age + 1.27 * (10.9 * weight + 660.7 * height_m),
        Gender::Male | Gender::Other => {
            864.0 - 9.72 * age + 1.27 * (14.2 * weight + 503.0 * height_m)
        }
    }
}

/// Copy of the baseline table with the profile-dependent rows overridden.
pub fn personalize(profile: &BiometricProfile) -> NutrientTable {
    let mut table = baseline().clone();
    let calories = calorie_target(profile);
    table.set(NutrientKey::Calories, NutrientRange::spread(calories));

    let over_29 = profile.age > 29;
    match profile.gender {
        Gender::Female => {
            table.set(NutrientKey::Iron, NutrientRange::new(18.0, 95.0, 18.0));
            table.set(NutrientKey::Potassium, NutrientRange::new(2000.0, 4000.0, 2600.0));
            table.set(NutrientKey::VitaminC, NutrientRange::new(70.0, 2000.0, 70.0));
            table.set(NutrientKey::Zinc, NutrientRange::new(8.0, 35.0, 8.0));
            let magnesium = if over_29 {
                NutrientRange::new(350.0, 420.0, 420.0)
            } else {
                NutrientRange::new(250.0, 310.0, 310.0)
            };
            table.set(NutrientKey::Magnesium, magnesium);
        }
        Gender::Male | Gender::Other => {
            if over_29 {
                table.set(NutrientKey::Magnesium, NutrientRange::new(350.0, 420.0, 420.0));
            }
        }
    }

    // 1 g fat = 9 kcal, 1 g carbohydrate = 4 kcal
    let carbs = 130.0 + (calories / 4.0) * 0.50;
    table.set(NutrientKey::Fat, NutrientRange::spread((calories / 9.0) * 0.30));
    table.set(NutrientKey::SaturatedFat, NutrientRange::spread((calories / 9.0) * 0.10));
    table.set(NutrientKey::Carbohydrates, NutrientRange::spread(carbs));
    // TODO: confirm fiber against calories * 0.0714; it currently mirrors carbohydrates
    table.set(NutrientKey::Fiber, NutrientRange::spread(carbs));
    table.set(NutrientKey::Sugars, NutrientRange::spread((calories / 9.0) * 0.10));
    table.set(NutrientKey::Protein, NutrientRange::spread(profile.weight_kg * 2.2));

    table
}
