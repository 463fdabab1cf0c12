use lazy_static::lazy_static;
use serde::Serialize;

use super::key::NutrientKey;

/// Share of a computed target used for its min/max band.
pub const SPREAD: f64 = 0.15;

/// Daily intake bounds for one nutrient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientRange {
    pub min: f64,
    pub max: f64,
    pub target: f64,
}

impl NutrientRange {
    pub const fn new(min: f64, max: f64, target: f64) -> Self {
        Self { min, max, target }
    }

    /// Range centred on `target`, `SPREAD` either side.
    pub fn spread(target: f64) -> Self {
        Self {
            min: target - target * SPREAD,
            max: target + target * SPREAD,
            target,
        }
    }

    pub fn half_range(&self) -> f64 {
        (self.max - self.min) / 2.0
    }
}

/// A complete key → range mapping. Every nutrient always has an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientTable {
    ranges: [NutrientRange; NutrientKey::COUNT],
}

impl NutrientTable {
    pub fn get(&self, key: NutrientKey) -> &NutrientRange {
        &self.ranges[key.index()]
    }

    pub fn set(&mut self, key: NutrientKey, range: NutrientRange) {
        self.ranges[key.index()] = range;
    }

    pub fn iter(&self) -> impl Iterator<Item = (NutrientKey, &NutrientRange)> {
        NutrientKey::ALL.iter().map(move |k| (*k, self.get(*k)))
    }
}

// FDA daily value guidance, https://www.fda.gov/media/99069/download
const BASELINE_RANGES: [NutrientRange; NutrientKey::COUNT] = [
    NutrientRange::new(50.0, 70.0, 78.0),       // fat, g
    NutrientRange::new(0.0, 20.0, 20.0),        // saturatedFat, g
    NutrientRange::new(0.0, 20.0, 0.0),         // transFat, g
    NutrientRange::new(50.0, 200.0, 10.0),      // cholesterol, mg
    NutrientRange::new(1500.0, 2300.0, 2300.0), // sodium, mg
    NutrientRange::new(225.0, 325.0, 275.0),    // carbohydrates, g
    NutrientRange::new(25.0, 35.0, 28.0),       // fiber, g
    NutrientRange::new(0.0, 50.0, 50.0),        // sugars, g
    NutrientRange::new(45.0, 65.0, 50.0),       // protein, g
    NutrientRange::new(700.0, 1200.0, 1000.0),  // calcium, mg
    NutrientRange::new(8.0, 85.0, 8.0),         // iron, mg
    NutrientRange::new(2600.0, 4700.0, 4700.0), // potassium, mg
    NutrientRange::new(320.0, 400.0, 400.0),    // magnesium, mg
    NutrientRange::new(700.0, 3000.0, 700.0),   // phosphorus, mg
    NutrientRange::new(11.0, 40.0, 11.0),       // zinc, mg
    NutrientRange::new(1800.0, 2500.0, 2000.0), // calories, kcal
    NutrientRange::new(90.0, 2000.0, 90.0),     // vitaminC, mg
    NutrientRange::new(600.0, 4000.0, 600.0),   // vitaminD, IU
];

lazy_static! {
    static ref BASELINE: NutrientTable = NutrientTable {
        ranges: BASELINE_RANGES,
    };
}

/// Shared, read-only reference table. Personalization works on a clone.
pub fn baseline() -> &'static NutrientTable {
    &BASELINE
}

#[cfg(test)]
mod reference_tests {
    use super::*;

    #[test]
    fn baseline_rows_line_up_with_keys() {
        let table = baseline();
        assert_eq!(*table.get(NutrientKey::Sodium), NutrientRange::new(1500.0, 2300.0, 2300.0));
        assert_eq!(*table.get(NutrientKey::Calories), NutrientRange::new(1800.0, 2500.0, 2000.0));
        assert_eq!(*table.get(NutrientKey::VitaminD), NutrientRange::new(600.0, 4000.0, 600.0));
        assert_eq!(table.iter().count(), NutrientKey::COUNT);
    }

    #[test]
    fn spread_is_fifteen_percent_each_side() {
        let r = NutrientRange::spread(200.0);
        assert!((r.min - 170.0).abs() < 1e-9);
        assert!((r.max - 230.0).abs() < 1e-9);
        assert!((r.half_range() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn clone_does_not_touch_baseline() {
        let mut copy = baseline().clone();
        copy.set(NutrientKey::Iron, NutrientRange::new(1.0, 2.0, 3.0));
        assert_eq!(baseline().get(NutrientKey::Iron).target, 8.0);
    }
}
