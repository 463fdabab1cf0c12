use std::cmp::Reverse;

use serde::Serialize;

use super::aggregate::NutrientValues;
use super::deviation::deviation;
use super::key::NutrientKey;
use super::reference::NutrientTable;

/// Gauge headroom above the range maximum.
const GAUGE_HEADROOM: f64 = 1.2;

/// Gauge data for one nutrient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub min_in: f64,
    pub max_in: f64,
    /// `max_in * 1.2`, truncated to a whole unit.
    pub max_range: i64,
    pub value: f64,
    pub deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNutrient {
    pub nutrient: NutrientKey,
    #[serde(flatten)]
    pub entry: ReportEntry,
}

/// Report entries, worst deviation first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NutrientReport {
    pub entries: Vec<RankedNutrient>,
}

impl NutrientReport {
    pub fn get(&self, key: NutrientKey) -> Option<&ReportEntry> {
        self.entries
            .iter()
            .find(|r| r.nutrient == key)
            .map(|r| &r.entry)
    }

    pub fn keys(&self) -> Vec<NutrientKey> {
        self.entries.iter().map(|r| r.nutrient).collect()
    }
}

/// Scores each averaged value against `ranges`, in table order, unranked.
pub fn build_entries(averages: &NutrientValues, ranges: &NutrientTable) -> Vec<RankedNutrient> {
    ranges
        .iter()
        .map(|(key, range)| {
            let value = averages.get(key);
            RankedNutrient {
                nutrient: key,
                entry: ReportEntry {
                    min_in: range.min,
                    max_in: range.max,
                    max_range: (range.max * GAUGE_HEADROOM) as i64,
                    value,
                    deviation: deviation(value, range),
                },
            }
        })
        .collect()
}

/// Orders by truncated deviation, descending. The sort is stable so equal
/// ranks keep table order.
pub fn rank(mut entries: Vec<RankedNutrient>) -> NutrientReport {
    entries.sort_by_key(|r| Reverse(r.entry.deviation as i64));
    NutrientReport { entries }
}

pub fn build_report(averages: &NutrientValues, ranges: &NutrientTable) -> NutrientReport {
    rank(build_entries(averages, ranges))
}
