use crate::api::models::ObservationRow;
use crate::domain::{Category, Series, YearSlot};
use std::collections::{BTreeMap, BTreeSet};

/// One observation, immutable once ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub secondary_id: i64,
    pub indicator_id: Option<i64>,
    pub category: Category,
    pub series: Series,
    pub slot: YearSlot,
    pub indicator: String,
    pub proxy: Option<String>,
    pub source: Option<String>,
    /// Calendar year string, tooltip-only; the slot is the recency key.
    pub year: Option<String>,
    pub value: Option<String>,
    /// Numeric value column, kept as stored so edits round-trip it.
    pub value_n: Option<String>,
    pub value_map: Option<String>,
    /// 0–100 scale; rows without a finite value never become records.
    pub standardized: f64,
    /// Drives the table's diverging color scale.
    pub table_standardized: Option<f64>,
    pub positive: bool,
}

impl Record {
    /// Display string for tooltips and table cells: the mapped value when
    /// it exists, otherwise the raw value unchanged.
    pub fn display_value(&self) -> &str {
        self.value_map
            .as_deref()
            .filter(|text| !text.is_empty())
            .or(self.value.as_deref())
            .unwrap_or("-")
    }
}

/// Counts reported by `Dataset::from_rows`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub kept: usize,
    /// Missing or non-finite standardized value.
    pub dropped_value: usize,
    /// Unparseable category, country, slot, or missing indicator name.
    pub dropped_key: usize,
}

/// The fetched observations bucketed category -> series -> slot.
///
/// BTreeMaps keep iteration deterministic; every record lives in exactly
/// one bucket.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    buckets: BTreeMap<Category, BTreeMap<Series, BTreeMap<YearSlot, Vec<Record>>>>,
    indicators: Vec<String>,
}

impl Dataset {
    pub fn from_rows(rows: Vec<ObservationRow>) -> (Self, IngestStats) {
        let mut dataset = Self::default();
        let mut stats = IngestStats::default();
        let mut indicator_names = BTreeSet::new();

        for row in rows {
            if let Some(name) = row.indicator.as_deref() {
                if !name.is_empty() {
                    indicator_names.insert(name.to_string());
                }
            }

            let Some(record) = Self::record_from_row(row, &mut stats) else {
                continue;
            };

            dataset
                .buckets
                .entry(record.category)
                .or_default()
                .entry(record.series)
                .or_default()
                .entry(record.slot)
                .or_default()
                .push(record);
            stats.kept += 1;
        }

        dataset.indicators = indicator_names.into_iter().collect();
        (dataset, stats)
    }

    fn record_from_row(row: ObservationRow, stats: &mut IngestStats) -> Option<Record> {
        let category = row.group_name.as_deref().and_then(Category::parse);
        let series = row.country.as_deref().and_then(Series::parse);
        let slot = row.year_type.and_then(YearSlot::from_i64);
        let indicator = row.indicator.clone().filter(|name| !name.is_empty());

        let (Some(category), Some(series), Some(slot), Some(indicator)) =
            (category, series, slot, indicator)
        else {
            stats.dropped_key += 1;
            return None;
        };

        let Some(standardized) = row.value_standardized.filter(|value| value.is_finite()) else {
            stats.dropped_value += 1;
            return None;
        };

        Some(Record {
            secondary_id: row.secondary_id,
            indicator_id: row.indicator_id,
            category,
            series,
            slot,
            indicator,
            proxy: row.proxy,
            source: row.source,
            year: row.year,
            value: row.value,
            value_n: row.value_n,
            value_map: row.value_map,
            standardized,
            table_standardized: row
                .value_standardized_table
                .filter(|value| value.is_finite()),
            positive: row.positive.unwrap_or(true),
        })
    }

    pub fn records(&self, category: Category, series: Series, slot: YearSlot) -> &[Record] {
        self.buckets
            .get(&category)
            .and_then(|by_series| by_series.get(&series))
            .and_then(|by_slot| by_slot.get(&slot))
            .map_or(&[], Vec::as_slice)
    }

    /// Slots for which a series has any record in the given category.
    pub fn slots(&self, category: Category, series: Series) -> Vec<YearSlot> {
        self.buckets
            .get(&category)
            .and_then(|by_series| by_series.get(&series))
            .map(|by_slot| by_slot.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.buckets.keys().copied()
    }

    /// All distinct indicator names seen in the fetched data, sorted.
    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.buckets
            .values()
            .flat_map(BTreeMap::values)
            .flat_map(BTreeMap::values)
            .flatten()
    }

    pub fn record_count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::api::models::ObservationRow;

    pub fn row(
        secondary_id: i64,
        group: &str,
        country: &str,
        slot: i64,
        indicator: &str,
        standardized: Option<f64>,
    ) -> ObservationRow {
        ObservationRow {
            indicator_id: Some(secondary_id),
            category_id: None,
            secondary_id,
            group_name: Some(group.to_string()),
            indicator: Some(indicator.to_string()),
            proxy: Some(format!("{indicator} proxy")),
            country: Some(country.to_string()),
            year: Some("2022".to_string()),
            year_type: Some(slot),
            source: Some("WDI".to_string()),
            value: Some("raw".to_string()),
            value_n: None,
            value_map: Some("mapped".to_string()),
            value_standardized: standardized,
            positive: Some(true),
            value_standardized_table: standardized.map(|value| value - 50.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::row;
    use super::*;
    use crate::domain::{Aggregate, Country};

    #[test]
    fn buckets_by_category_series_and_slot() {
        let rows = vec![
            row(1, "Vision", "India", 1, "GDP", Some(80.0)),
            row(2, "Vision", "India", 2, "GDP", Some(60.0)),
            row(3, "Planet", "Nepal", 1, "Forest cover", Some(40.0)),
        ];
        let (dataset, stats) = Dataset::from_rows(rows);

        assert_eq!(stats.kept, 3);
        assert_eq!(dataset.record_count(), 3);

        let india = Series::Country(Country::India);
        assert_eq!(
            dataset.records(Category::Vision, india, YearSlot::First).len(),
            1
        );
        assert_eq!(
            dataset.records(Category::Vision, india, YearSlot::Second).len(),
            1
        );
        assert!(dataset
            .records(Category::Planet, india, YearSlot::First)
            .is_empty());
        assert_eq!(
            dataset.slots(Category::Vision, india),
            vec![YearSlot::First, YearSlot::Second]
        );
    }

    #[test]
    fn drops_rows_without_finite_standardized_value() {
        let rows = vec![
            row(1, "Vision", "India", 1, "GDP", Some(80.0)),
            row(2, "Vision", "India", 1, "GDP", None),
            row(3, "Vision", "India", 1, "GDP", Some(f64::NAN)),
        ];
        let (dataset, stats) = Dataset::from_rows(rows);
        assert_eq!(stats.kept, 1);
        assert_eq!(stats.dropped_value, 2);
        assert_eq!(dataset.record_count(), 1);
    }

    #[test]
    fn drops_rows_with_unknown_keys_but_keeps_indicator_list() {
        let rows = vec![
            row(1, "Vision", "Atlantis", 1, "GDP", Some(80.0)),
            row(2, "NotACategory", "India", 1, "GDP", Some(80.0)),
            row(3, "Vision", "India", 9, "GDP", Some(80.0)),
        ];
        let (dataset, stats) = Dataset::from_rows(rows);
        assert_eq!(stats.kept, 0);
        assert_eq!(stats.dropped_key, 3);
        // The axis vocabulary still remembers the name.
        assert_eq!(dataset.indicators(), ["GDP".to_string()]);
    }

    #[test]
    fn aggregates_bucket_as_series() {
        let rows = vec![row(1, "Vision", "South Asia Region", 1, "GDP", Some(55.0))];
        let (dataset, _) = Dataset::from_rows(rows);
        let sar = Series::Aggregate(Aggregate::SouthAsia);
        assert_eq!(dataset.records(Category::Vision, sar, YearSlot::First).len(), 1);
    }

    #[test]
    fn display_value_prefers_mapped_then_raw() {
        let rows = vec![row(1, "Vision", "India", 1, "GDP", Some(80.0))];
        let (dataset, _) = Dataset::from_rows(rows);
        let india = Series::Country(Country::India);
        let record = &dataset.records(Category::Vision, india, YearSlot::First)[0];
        assert_eq!(record.display_value(), "mapped");

        let mut bare = record.clone();
        bare.value_map = None;
        assert_eq!(bare.display_value(), "raw");
        bare.value = None;
        assert_eq!(bare.display_value(), "-");
    }
}
