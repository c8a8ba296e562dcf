use super::store::{Dataset, Record};
use crate::domain::{Aggregate, CategoryFilter, Country, Series, YearSlot};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// User-chosen countries and, per country, chosen recency slots.
///
/// A country's slot set is empty until the user picks slots and is cleared
/// entirely on deselect. The model does not cap slots per country; the UI
/// keeps at most two.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    countries: BTreeSet<Country>,
    slots: BTreeMap<Country, BTreeSet<YearSlot>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_country_selected(&self, country: Country) -> bool {
        self.countries.contains(&country)
    }

    /// Selects or deselects a country. Deselecting drops its slot set.
    /// Returns true when the country is selected afterwards.
    pub fn toggle_country(&mut self, country: Country) -> bool {
        if self.countries.remove(&country) {
            self.slots.remove(&country);
            false
        } else {
            self.countries.insert(country);
            self.slots.insert(country, BTreeSet::new());
            true
        }
    }

    /// Toggles a slot for an already-selected country. Returns true when
    /// the slot is selected afterwards; no-op for unselected countries.
    pub fn toggle_slot(&mut self, country: Country, slot: YearSlot) -> bool {
        if !self.countries.contains(&country) {
            return false;
        }
        let slots = self.slots.entry(country).or_default();
        if slots.remove(&slot) {
            false
        } else {
            slots.insert(slot);
            true
        }
    }

    pub fn deselect_slot(&mut self, country: Country, slot: YearSlot) {
        if let Some(slots) = self.slots.get_mut(&country) {
            slots.remove(&slot);
        }
    }

    pub fn slots_for(&self, country: Country) -> impl Iterator<Item = YearSlot> + '_ {
        self.slots
            .get(&country)
            .into_iter()
            .flat_map(|slots| slots.iter().copied())
    }

    pub fn is_slot_selected(&self, country: Country, slot: YearSlot) -> bool {
        self.slots
            .get(&country)
            .is_some_and(|slots| slots.contains(&slot))
    }

    /// Every selected (country, slot) pair in country-then-slot order.
    pub fn pairs(&self) -> Vec<(Country, YearSlot)> {
        self.countries
            .iter()
            .flat_map(|&country| self.slots_for(country).map(move |slot| (country, slot)))
            .collect()
    }

    pub fn countries(&self) -> impl Iterator<Item = Country> + '_ {
        self.countries.iter().copied()
    }

    /// Union of slots selected for any country; drives which aggregate
    /// polygons join the comparison.
    pub fn slot_union(&self) -> BTreeSet<YearSlot> {
        self.slots.values().flatten().copied().collect()
    }

    /// True when nothing would render: no selected (country, slot) pair.
    pub fn is_empty(&self) -> bool {
        self.slots.values().all(BTreeSet::is_empty)
    }
}

/// Grouping key for rankings and table column order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Group ranks by slot; columns ordered slot-then-country.
    #[default]
    ByYearSlot,
    /// Group ranks by country; columns ordered country-then-slot.
    ByCountry,
}

impl SortMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::ByYearSlot => Self::ByCountry,
            Self::ByCountry => Self::ByYearSlot,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ByYearSlot => "by year",
            Self::ByCountry => "by country",
        }
    }
}

/// Typed join key for one polygon and its markers, labels, and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub series: Series,
    pub slot: YearSlot,
}

impl SeriesKey {
    pub const fn new(series: Series, slot: YearSlot) -> Self {
        Self { series, slot }
    }

    pub fn title(&self) -> String {
        format!("{} ({})", self.series.label(), self.slot.label())
    }
}

/// Records backing one polygon, restricted to the active categories.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub key: SeriesKey,
    pub records: Vec<Record>,
}

impl SeriesData {
    pub fn record_for(&self, indicator: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.indicator == indicator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankEntry {
    /// 1-based position within the group, descending by standardized value.
    pub rank: usize,
    pub group_size: usize,
}

/// Ranks for country records, keyed by (indicator, country, slot).
/// Aggregates never rank.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Rankings {
    entries: HashMap<(String, Country, YearSlot), RankEntry>,
}

impl Rankings {
    pub fn get(&self, indicator: &str, country: Country, slot: YearSlot) -> Option<RankEntry> {
        self.entries
            .get(&(indicator.to_string(), country, slot))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the renderers read. Derived, recomputed on every selection
/// change; never mutated in place.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FilteredView {
    /// Sorted union of indicator names across the visible series; the
    /// radar's angular axes and the table's rows.
    pub indicators: Vec<String>,
    /// Country series in country-then-slot order, then aggregate series.
    pub series: Vec<SeriesData>,
    pub rankings: Rankings,
}

impl FilteredView {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn series_for(&self, key: SeriesKey) -> Option<&SeriesData> {
        self.series.iter().find(|data| data.key == key)
    }

    /// Selected (country, slot) columns in the order the table shows them.
    pub fn columns(&self, mode: SortMode) -> Vec<SeriesKey> {
        let mut columns: Vec<SeriesKey> = self
            .series
            .iter()
            .filter(|data| !data.key.series.is_aggregate())
            .map(|data| data.key)
            .collect();
        match mode {
            SortMode::ByYearSlot => columns.sort_by_key(|key| (key.slot, key.series)),
            SortMode::ByCountry => columns.sort_by_key(|key| (key.series, key.slot)),
        }
        columns
    }
}

/// The filter/rank step: pure, idempotent, and cheap enough to run on
/// every selection change. An empty selection short-circuits to an empty
/// view so downstream rendering can skip entirely.
pub fn filter_view(
    dataset: &Dataset,
    selection: &Selection,
    filter: CategoryFilter,
    mode: SortMode,
) -> FilteredView {
    if selection.is_empty() {
        return FilteredView::default();
    }

    let categories = filter.categories();
    let mut series = Vec::new();

    for (country, slot) in selection.pairs() {
        let key = SeriesKey::new(Series::Country(country), slot);
        let mut records = Vec::new();
        for &category in categories {
            records.extend_from_slice(dataset.records(category, key.series, slot));
        }
        series.push(SeriesData { key, records });
    }

    // Regional aggregates join the comparison for every slot in play.
    for slot in selection.slot_union() {
        for aggregate in Aggregate::ALL {
            let key = SeriesKey::new(Series::Aggregate(aggregate), slot);
            let mut records = Vec::new();
            for &category in categories {
                records.extend_from_slice(dataset.records(category, key.series, slot));
            }
            if !records.is_empty() {
                series.push(SeriesData { key, records });
            }
        }
    }

    let mut indicators: Vec<String> = series
        .iter()
        .flat_map(|data| data.records.iter().map(|record| record.indicator.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    indicators.sort();

    let rankings = rank(&series, mode);

    FilteredView {
        indicators,
        series,
        rankings,
    }
}

/// Groups eligible records by (indicator, grouping-key), sorts each group
/// descending by standardized value (stable: insertion order breaks ties),
/// and assigns 1-based ranks.
fn rank(series: &[SeriesData], mode: SortMode) -> Rankings {
    #[derive(PartialEq, Eq, Hash)]
    enum GroupKey {
        Slot(YearSlot),
        Country(Country),
    }

    let mut groups: HashMap<(String, GroupKey), Vec<(Country, YearSlot, f64)>> = HashMap::new();

    for data in series {
        let Series::Country(country) = data.key.series else {
            continue;
        };
        for record in &data.records {
            let group_key = match mode {
                SortMode::ByYearSlot => GroupKey::Slot(data.key.slot),
                SortMode::ByCountry => GroupKey::Country(country),
            };
            groups
                .entry((record.indicator.clone(), group_key))
                .or_default()
                .push((country, data.key.slot, record.standardized));
        }
    }

    let mut rankings = Rankings::default();
    for ((indicator, _), mut members) in groups {
        members.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
        let group_size = members.len();
        for (position, (country, slot, _)) in members.into_iter().enumerate() {
            rankings.entries.insert(
                (indicator.clone(), country, slot),
                RankEntry {
                    rank: position + 1,
                    group_size,
                },
            );
        }
    }
    rankings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::ObservationRow;
    use crate::domain::Category;
    use crate::scorecard::store::fixtures::row;

    fn dataset(rows: Vec<ObservationRow>) -> Dataset {
        Dataset::from_rows(rows).0
    }

    fn select(pairs: &[(Country, &[u8])]) -> Selection {
        let mut selection = Selection::new();
        for (country, slots) in pairs {
            selection.toggle_country(*country);
            for slot in *slots {
                let slot = YearSlot::from_u8(*slot).expect("test slot");
                selection.toggle_slot(*country, slot);
            }
        }
        selection
    }

    fn vision() -> CategoryFilter {
        CategoryFilter::Single(Category::Vision)
    }

    #[test]
    fn empty_selection_short_circuits() {
        let dataset = dataset(vec![row(1, "Vision", "India", 1, "GDP", Some(80.0))]);
        let view = filter_view(&dataset, &Selection::new(), vision(), SortMode::ByYearSlot);
        assert!(view.is_empty());
        assert!(view.indicators.is_empty());
        assert!(view.rankings.is_empty());

        // A selected country with no chosen slots is still empty.
        let selection = select(&[(Country::India, &[])]);
        let view = filter_view(&dataset, &selection, vision(), SortMode::ByYearSlot);
        assert!(view.is_empty());
    }

    #[test]
    fn filter_is_idempotent() {
        let dataset = dataset(vec![
            row(1, "Vision", "India", 1, "GDP", Some(80.0)),
            row(2, "Vision", "Nepal", 1, "GDP", Some(70.0)),
            row(3, "Vision", "India", 2, "Literacy", Some(55.0)),
        ]);
        let selection = select(&[(Country::India, &[1, 2]), (Country::Nepal, &[1])]);
        let first = filter_view(&dataset, &selection, vision(), SortMode::ByYearSlot);
        let second = filter_view(&dataset, &selection, vision(), SortMode::ByYearSlot);
        assert_eq!(first, second);
    }

    #[test]
    fn ranks_are_contiguous_and_descending() {
        let dataset = dataset(vec![
            row(1, "Vision", "India", 1, "GDP", Some(80.0)),
            row(2, "Vision", "Nepal", 1, "GDP", Some(92.0)),
            row(3, "Vision", "Bhutan", 1, "GDP", Some(92.0)),
            row(4, "Vision", "Maldives", 1, "GDP", Some(15.0)),
        ]);
        let selection = select(&[
            (Country::India, &[1]),
            (Country::Nepal, &[1]),
            (Country::Bhutan, &[1]),
            (Country::Maldives, &[1]),
        ]);
        let view = filter_view(&dataset, &selection, vision(), SortMode::ByYearSlot);

        let mut ranks: Vec<usize> = [
            Country::India,
            Country::Nepal,
            Country::Bhutan,
            Country::Maldives,
        ]
        .iter()
        .map(|&country| {
            let entry = view
                .rankings
                .get("GDP", country, YearSlot::First)
                .expect("ranked");
            assert_eq!(entry.group_size, 4);
            entry.rank
        })
        .collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3, 4]);

        // Ties keep insertion order: Bhutan selected after Nepal, both 92.
        let nepal = view.rankings.get("GDP", Country::Nepal, YearSlot::First);
        let bhutan = view.rankings.get("GDP", Country::Bhutan, YearSlot::First);
        assert!(nepal.map(|e| e.rank) < bhutan.map(|e| e.rank));
        assert_eq!(
            view.rankings
                .get("GDP", Country::Maldives, YearSlot::First)
                .map(|e| e.rank),
            Some(4)
        );
    }

    #[test]
    fn aggregates_join_series_but_never_rank() {
        let dataset = dataset(vec![
            row(1, "Vision", "India", 1, "GDP", Some(80.0)),
            row(2, "Vision", "South Asia Region", 1, "GDP", Some(55.0)),
        ]);
        let selection = select(&[(Country::India, &[1])]);
        let view = filter_view(&dataset, &selection, vision(), SortMode::ByYearSlot);

        let aggregate_key =
            SeriesKey::new(Series::Aggregate(Aggregate::SouthAsia), YearSlot::First);
        assert!(view.series_for(aggregate_key).is_some());

        let entry = view
            .rankings
            .get("GDP", Country::India, YearSlot::First)
            .expect("ranked");
        // India ranks alone: the aggregate is not in the group.
        assert_eq!(entry.group_size, 1);
        assert_eq!(entry.rank, 1);
        // Aggregate columns never appear in the table.
        assert!(view
            .columns(SortMode::ByYearSlot)
            .iter()
            .all(|key| !key.series.is_aggregate()));
    }

    #[test]
    fn combined_category_merges_three_groups() {
        let dataset = dataset(vec![
            row(1, "Prosperity", "India", 1, "Exports", Some(40.0)),
            row(2, "Digital", "India", 1, "Broadband", Some(60.0)),
            row(3, "Infrastructure", "India", 1, "Roads", Some(30.0)),
            row(4, "Planet", "India", 1, "Forest cover", Some(20.0)),
        ]);
        let selection = select(&[(Country::India, &[1])]);
        let view = filter_view(
            &dataset,
            &selection,
            CategoryFilter::ProsperityDigitalInfrastructure,
            SortMode::ByYearSlot,
        );
        assert_eq!(
            view.indicators,
            vec!["Broadband".to_string(), "Exports".to_string(), "Roads".to_string()]
        );
    }

    #[test]
    fn india_two_slot_scenario() {
        let dataset = dataset(vec![
            row(1, "Vision", "India", 1, "GDP", Some(80.0)),
            row(2, "Vision", "India", 2, "GDP", Some(60.0)),
        ]);
        let selection = select(&[(Country::India, &[1, 2])]);
        let view = filter_view(&dataset, &selection, vision(), SortMode::ByYearSlot);

        assert_eq!(view.indicators, vec!["GDP".to_string()]);
        assert_eq!(view.series.len(), 2);
        let slot_one = view
            .series_for(SeriesKey::new(Series::Country(Country::India), YearSlot::First))
            .expect("slot 1 series");
        let slot_two = view
            .series_for(SeriesKey::new(Series::Country(Country::India), YearSlot::Second))
            .expect("slot 2 series");
        assert_eq!(slot_one.record_for("GDP").map(|r| r.standardized), Some(80.0));
        assert_eq!(slot_two.record_for("GDP").map(|r| r.standardized), Some(60.0));

        let entry = view
            .rankings
            .get("GDP", Country::India, YearSlot::First)
            .expect("ranked");
        assert_eq!((entry.rank, entry.group_size), (1, 1));
    }

    #[test]
    fn deselecting_a_country_removes_every_trace() {
        let dataset = dataset(vec![
            row(1, "Vision", "India", 1, "GDP", Some(80.0)),
            row(2, "Vision", "Nepal", 1, "GDP", Some(70.0)),
        ]);
        let mut selection = select(&[(Country::India, &[1]), (Country::Nepal, &[1])]);

        selection.toggle_country(Country::Nepal);
        assert!(!selection.is_country_selected(Country::Nepal));
        assert_eq!(selection.slots_for(Country::Nepal).count(), 0);

        let view = filter_view(&dataset, &selection, vision(), SortMode::ByYearSlot);
        assert!(view
            .series
            .iter()
            .all(|data| data.key.series != Series::Country(Country::Nepal)));
        assert!(view.rankings.get("GDP", Country::Nepal, YearSlot::First).is_none());

        // Re-selecting starts from an empty slot set.
        selection.toggle_country(Country::Nepal);
        assert_eq!(selection.slots_for(Country::Nepal).count(), 0);
    }

    #[test]
    fn sort_mode_changes_grouping_key_and_column_order() {
        let dataset = dataset(vec![
            row(1, "Vision", "India", 1, "GDP", Some(80.0)),
            row(2, "Vision", "India", 2, "GDP", Some(60.0)),
            row(3, "Vision", "Nepal", 1, "GDP", Some(70.0)),
        ]);
        let selection = select(&[(Country::India, &[1, 2]), (Country::Nepal, &[1])]);

        let by_slot = filter_view(&dataset, &selection, vision(), SortMode::ByYearSlot);
        // Slot 1 group holds both countries.
        assert_eq!(
            by_slot
                .rankings
                .get("GDP", Country::India, YearSlot::First)
                .map(|e| (e.rank, e.group_size)),
            Some((1, 2))
        );
        assert_eq!(
            by_slot
                .rankings
                .get("GDP", Country::India, YearSlot::Second)
                .map(|e| e.group_size),
            Some(1)
        );

        let by_country = filter_view(&dataset, &selection, vision(), SortMode::ByCountry);
        // India's group is its own two slots.
        assert_eq!(
            by_country
                .rankings
                .get("GDP", Country::India, YearSlot::First)
                .map(|e| (e.rank, e.group_size)),
            Some((1, 2))
        );
        assert_eq!(
            by_country
                .rankings
                .get("GDP", Country::India, YearSlot::Second)
                .map(|e| (e.rank, e.group_size)),
            Some((2, 2))
        );

        // Column ordering flips with the mode; the dataset is untouched.
        let slot_major = by_slot.columns(SortMode::ByYearSlot);
        assert_eq!(
            slot_major,
            vec![
                SeriesKey::new(Series::Country(Country::India), YearSlot::First),
                SeriesKey::new(Series::Country(Country::Nepal), YearSlot::First),
                SeriesKey::new(Series::Country(Country::India), YearSlot::Second),
            ]
        );
        let country_major = by_country.columns(SortMode::ByCountry);
        assert_eq!(
            country_major,
            vec![
                SeriesKey::new(Series::Country(Country::India), YearSlot::First),
                SeriesKey::new(Series::Country(Country::India), YearSlot::Second),
                SeriesKey::new(Series::Country(Country::Nepal), YearSlot::First),
            ]
        );
        assert_eq!(dataset.record_count(), 3);
    }
}
