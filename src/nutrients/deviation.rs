use super::reference::NutrientRange;

/// Distance of `value` from the range target, in half-ranges.
///
/// 0 means on target, 1 means one half-range away. Not clamped. A range with
/// no width falls back to the absolute distance.
pub fn deviation(value: f64, range: &NutrientRange) -> f64 {
    let distance = (range.target - value).abs();
    let half = range.half_range();
    if half == 0.0 {
        return distance;
    }
    distance / half
}

#[cfg(test)]
mod deviation_tests {
    use super::*;
    use crate::nutrients::key::NutrientKey;
    use crate::nutrients::personalize::{personalize, BiometricProfile, Gender};
    use crate::nutrients::reference::baseline;

    fn tables() -> Vec<crate::nutrients::reference::NutrientTable> {
        vec![
            baseline().clone(),
            personalize(&BiometricProfile {
                age: 34,
                height_cm: 165.0,
                weight_kg: 60.0,
                gender: Gender::Female,
            }),
            personalize(&BiometricProfile {
                age: 52,
                height_cm: 188.0,
                weight_kg: 95.0,
                gender: Gender::Male,
            }),
        ]
    }

    #[test]
    fn on_target_is_zero() {
        for table in tables() {
            for (key, range) in table.iter() {
                assert_eq!(deviation(range.target, range), 0.0, "{key}");
            }
        }
    }

    #[test]
    fn one_half_range_away_is_one() {
        for table in tables() {
            for (key, range) in table.iter() {
                let d = deviation(range.target + range.half_range(), range);
                assert!((d - 1.0).abs() < 1e-9, "{key}: {d}");
            }
        }
    }

    #[test]
    fn zero_intake_scores_target_over_half_range() {
        let range = baseline().get(NutrientKey::Sodium);
        assert_eq!(deviation(0.0, range), 2300.0 / 400.0);
    }

    #[test]
    fn not_clamped() {
        let range = NutrientRange::new(0.0, 20.0, 0.0);
        assert_eq!(deviation(500.0, &range), 50.0);
    }

    #[test]
    fn zero_width_range_uses_plain_distance() {
        let range = NutrientRange::new(5.0, 5.0, 5.0);
        assert_eq!(deviation(5.0, &range), 0.0);
        assert_eq!(deviation(8.0, &range), 3.0);
    }
}
