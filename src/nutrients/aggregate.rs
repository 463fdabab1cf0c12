use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

use super::key::NutrientKey;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One amount per nutrient. Used both for a food's per-serving content and
/// for averaged daily intake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientValues {
    pub fat: f64,
    pub saturated_fat: f64,
    pub trans_fat: f64,
    pub cholesterol: f64,
    pub sodium: f64,
    pub carbohydrates: f64,
    pub fiber: f64,
    pub sugars: f64,
    pub protein: f64,
    pub calcium: f64,
    pub iron: f64,
    pub potassium: f64,
    pub magnesium: f64,
    pub phosphorus: f64,
    pub zinc: f64,
    pub calories: f64,
    pub vitamin_c: f64,
    pub vitamin_d: f64,
}

impl NutrientValues {
    pub fn get(&self, key: NutrientKey) -> f64 {
        *self.slot(key)
    }

    pub fn set(&mut self, key: NutrientKey, value: f64) {
        *self.slot_mut(key) = value;
    }

    fn slot(&self, key: NutrientKey) -> &f64 {
        match key {
            NutrientKey::Fat => &self.fat,
            NutrientKey::SaturatedFat => &self.saturated_fat,
            NutrientKey::TransFat => &self.trans_fat,
            NutrientKey::Cholesterol => &self.cholesterol,
            NutrientKey::Sodium => &self.sodium,
            NutrientKey::Carbohydrates => &self.carbohydrates,
            NutrientKey::Fiber => &self.fiber,
            NutrientKey::Sugars => &self.sugars,
            NutrientKey::Protein => &self.protein,
            NutrientKey::Calcium => &self.calcium,
            NutrientKey::Iron => &self.iron,
            NutrientKey::Potassium => &self.potassium,
            NutrientKey::Magnesium => &self.magnesium,
            NutrientKey::Phosphorus => &self.phosphorus,
            NutrientKey::Zinc => &self.zinc,
            NutrientKey::Calories => &self.calories,
            NutrientKey::VitaminC => &self.vitamin_c,
            NutrientKey::VitaminD => &self.vitamin_d,
        }
    }

    fn slot_mut(&mut self, key: NutrientKey) -> &mut f64 {
        match key {
            NutrientKey::Fat => &mut self.fat,
            NutrientKey::SaturatedFat => &mut self.saturated_fat,
            NutrientKey::TransFat => &mut self.trans_fat,
            NutrientKey::Cholesterol => &mut self.cholesterol,
            NutrientKey::Sodium => &mut self.sodium,
            NutrientKey::Carbohydrates => &mut self.carbohydrates,
            NutrientKey::Fiber => &mut self.fiber,
            NutrientKey::Sugars => &mut self.sugars,
            NutrientKey::Protein => &mut self.protein,
            NutrientKey::Calcium => &mut self.calcium,
            NutrientKey::Iron => &mut self.iron,
            NutrientKey::Potassium => &mut self.potassium,
            NutrientKey::Magnesium => &mut self.magnesium,
            NutrientKey::Phosphorus => &mut self.phosphorus,
            NutrientKey::Zinc => &mut self.zinc,
            NutrientKey::Calories => &mut self.calories,
            NutrientKey::VitaminC => &mut self.vitamin_c,
            NutrientKey::VitaminD => &mut self.vitamin_d,
        }
    }
}

/// A logged food, already joined with the food's nutrient content.
///
/// `percent_consumed` is a raw multiplier of the reference serving
/// (1.0 = one serving). Writers keep it within [0, 1000].
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionEvent {
    pub consumed_at: OffsetDateTime,
    pub percent_consumed: f64,
    pub food: NutrientValues,
}

/// Averaging interval, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl Window {
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self { start, end }
    }

    /// Window of `days` ending at `end`.
    pub fn trailing_days(end: OffsetDateTime, days: i64) -> Self {
        Self {
            start: end - time::Duration::days(days),
            end,
        }
    }

    pub fn length_days(&self) -> f64 {
        (self.end - self.start).as_seconds_f64() / SECONDS_PER_DAY
    }

    pub fn contains(&self, at: OffsetDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Total intake per nutrient divided by the window length in days.
///
/// Events outside the window are ignored. A zero or negative window length
/// yields all zeros.
pub fn average_intake(events: &[ConsumptionEvent], window: Window) -> NutrientValues {
    let days = window.length_days();
    let mut averages = NutrientValues::default();
    if days <= 0.0 {
        debug!(days, "degenerate window, reporting zero intake");
        return averages;
    }

    let in_window: Vec<&ConsumptionEvent> = events
        .iter()
        .filter(|e| window.contains(e.consumed_at))
        .collect();
    for key in NutrientKey::ALL {
        let total: f64 = in_window
            .iter()
            .map(|e| e.food.get(key) * e.percent_consumed)
            .sum();
        averages.set(key, total / days);
    }
    debug!(events = in_window.len(), days, "intake averaged");
    averages
}

#[cfg(test)]
mod aggregate_tests {
    use super::*;
    use time::macros::datetime;

    fn event(at: OffsetDateTime, percent: f64, food: NutrientValues) -> ConsumptionEvent {
        ConsumptionEvent {
            consumed_at: at,
            percent_consumed: percent,
            food,
        }
    }

    #[test]
    fn half_serving_of_sodium_over_one_day() {
        let food = NutrientValues {
            sodium: 1000.0,
            ..Default::default()
        };
        let window = Window::new(datetime!(2024-03-01 0:00 UTC), datetime!(2024-03-02 0:00 UTC));
        let avg = average_intake(&[event(datetime!(2024-03-01 12:00 UTC), 0.5, food)], window);
        assert_eq!(avg.sodium, 500.0);
        assert_eq!(avg.protein, 0.0);
    }

    #[test]
    fn protein_over_two_days() {
        let food = NutrientValues {
            protein: 10.0,
            ..Default::default()
        };
        let window = Window::new(datetime!(2024-03-01 0:00 UTC), datetime!(2024-03-03 0:00 UTC));
        let events = [
            event(datetime!(2024-03-01 08:00 UTC), 1.0, food),
            event(datetime!(2024-03-02 19:30 UTC), 2.0, food),
        ];
        assert_eq!(average_intake(&events, window).protein, 15.0);
    }

    #[test]
    fn empty_log_averages_to_zero() {
        let window = Window::trailing_days(datetime!(2024-03-08 0:00 UTC), 7);
        assert_eq!(average_intake(&[], window), NutrientValues::default());
    }

    #[test]
    fn zero_and_negative_windows_yield_zero() {
        let food = NutrientValues {
            calories: 300.0,
            ..Default::default()
        };
        let at = datetime!(2024-03-01 12:00 UTC);
        let events = [event(at, 1.0, food)];
        assert_eq!(average_intake(&events, Window::new(at, at)), NutrientValues::default());
        let backwards = Window::new(datetime!(2024-03-02 0:00 UTC), datetime!(2024-03-01 0:00 UTC));
        assert_eq!(average_intake(&events, backwards), NutrientValues::default());
    }

    #[test]
    fn bounds_are_inclusive_and_outside_events_ignored() {
        let food = NutrientValues {
            iron: 4.0,
            ..Default::default()
        };
        let start = datetime!(2024-03-01 0:00 UTC);
        let end = datetime!(2024-03-02 0:00 UTC);
        let events = [
            event(start, 1.0, food),
            event(end, 1.0, food),
            event(datetime!(2024-03-03 0:00 UTC), 1.0, food),
        ];
        assert_eq!(average_intake(&events, Window::new(start, end)).iron, 8.0);
    }

    #[test]
    fn percent_is_a_raw_multiplier() {
        let food = NutrientValues {
            zinc: 2.0,
            ..Default::default()
        };
        let window = Window::new(datetime!(2024-03-01 0:00 UTC), datetime!(2024-03-02 0:00 UTC));
        let events = [event(datetime!(2024-03-01 1:00 UTC), 150.0, food)];
        assert_eq!(average_intake(&events, window).zinc, 300.0);
    }

    #[test]
    fn get_and_set_cover_every_key() {
        let mut values = NutrientValues::default();
        for (i, key) in NutrientKey::ALL.iter().enumerate() {
            values.set(*key, i as f64 + 1.0);
        }
        for (i, key) in NutrientKey::ALL.iter().enumerate() {
            assert_eq!(values.get(*key), i as f64 + 1.0);
        }
    }
}
