use crate::api::models::{IndicatorRow, ObservationRow, SaveIndicatorRequest, SaveScorecardRequest};
use crate::app::animation::AnimationSet;
use crate::domain::{Aggregate, Category, CategoryFilter, Country, Series, YearSlot};
use crate::scorecard::{filter_view, Dataset, FilteredView, IngestStats, Record, Selection, SeriesKey, SortMode};
use std::collections::BTreeMap;
use std::time::Instant;

/// The UI lets a country carry at most this many recency slots at once;
/// picking a third silently releases the oldest pick.
pub const MAX_SLOTS_PER_COUNTRY: usize = 2;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AppScreen {
    Dashboard,
    Observations,
    Indicators,
    EditObservation,
    EditIndicator,
}

/// Backend work queued by input handlers; the event loop drains it
/// through the save state machine.
#[derive(Debug, Clone)]
pub enum PendingRequest {
    SaveObservation(SaveScorecardRequest),
    SaveIndicator(SaveIndicatorRequest),
    Reload,
    FetchIndicators,
}

/// Which pane of the dashboard owns the arrow keys.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DashboardFocus {
    Countries,
    Slots,
    Table,
}

/// One highlighted data point: a series plus an axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub key: SeriesKey,
    pub axis_index: usize,
}

/// Series options offered by the observation form's country field.
pub const SERIES_OPTIONS: [Series; 10] = [
    Series::Country(Country::India),
    Series::Country(Country::Pakistan),
    Series::Country(Country::Bangladesh),
    Series::Country(Country::SriLanka),
    Series::Country(Country::Nepal),
    Series::Country(Country::Bhutan),
    Series::Country(Country::Afghanistan),
    Series::Country(Country::Maldives),
    Series::Aggregate(Aggregate::SouthAsia),
    Series::Aggregate(Aggregate::SouthAsiaExclIndia),
];

/// Fields of the observation form, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationField {
    Indicator,
    Proxy,
    Category,
    Country,
    Slot,
    Year,
    Source,
    Value,
    ValueN,
    ValueMap,
    ValueStandardized,
    TableStandardized,
    Positive,
}

impl ObservationField {
    pub const ALL: [Self; 13] = [
        Self::Indicator,
        Self::Proxy,
        Self::Category,
        Self::Country,
        Self::Slot,
        Self::Year,
        Self::Source,
        Self::Value,
        Self::ValueN,
        Self::ValueMap,
        Self::ValueStandardized,
        Self::TableStandardized,
        Self::Positive,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Indicator => "Indicator",
            Self::Proxy => "Proxy",
            Self::Category => "Category",
            Self::Country => "Country",
            Self::Slot => "Year slot",
            Self::Year => "Year",
            Self::Source => "Source",
            Self::Value => "Value",
            Self::ValueN => "Value (numeric)",
            Self::ValueMap => "Value (display)",
            Self::ValueStandardized => "Standardized",
            Self::TableStandardized => "Standardized (table)",
            Self::Positive => "Positive indicator",
        }
    }

    /// Cycling fields take Left/Right instead of free text.
    pub const fn cycles(self) -> bool {
        matches!(self, Self::Category | Self::Country | Self::Slot | Self::Positive)
    }
}

/// Draft of one observation row being created or edited.
#[derive(Debug, Clone)]
pub struct EditObservationState {
    pub field_index: usize,
    pub editing: bool,
    /// None creates a new row on save.
    pub secondary_id: Option<i64>,
    pub indicator_id: Option<i64>,
    pub category_index: usize,
    pub series_index: usize,
    pub slot_index: usize,
    pub indicator: String,
    pub proxy: String,
    pub year: String,
    pub source: String,
    pub value: String,
    pub value_n: String,
    pub value_map: String,
    pub value_standardized: String,
    pub table_standardized: String,
    pub positive: bool,
}

impl EditObservationState {
    pub fn blank() -> Self {
        Self {
            field_index: 0,
            editing: false,
            secondary_id: None,
            indicator_id: None,
            category_index: 0,
            series_index: 0,
            slot_index: 0,
            indicator: String::new(),
            proxy: String::new(),
            year: String::new(),
            source: String::new(),
            value: String::new(),
            value_n: String::new(),
            value_map: String::new(),
            value_standardized: String::new(),
            table_standardized: String::new(),
            positive: true,
        }
    }

    pub fn from_record(record: &Record) -> Self {
        let category_index = Category::ALL
            .iter()
            .position(|&category| category == record.category)
            .unwrap_or(0);
        let series_index = SERIES_OPTIONS
            .iter()
            .position(|&series| series == record.series)
            .unwrap_or(0);
        Self {
            field_index: 0,
            editing: false,
            secondary_id: Some(record.secondary_id),
            indicator_id: record.indicator_id,
            category_index,
            series_index,
            slot_index: (record.slot.as_u8() - 1) as usize,
            indicator: record.indicator.clone(),
            proxy: record.proxy.clone().unwrap_or_default(),
            year: record.year.clone().unwrap_or_default(),
            source: record.source.clone().unwrap_or_default(),
            value: record.value.clone().unwrap_or_default(),
            value_n: record.value_n.clone().unwrap_or_default(),
            value_map: record.value_map.clone().unwrap_or_default(),
            value_standardized: format_float(record.standardized),
            table_standardized: record.table_standardized.map(format_float).unwrap_or_default(),
            positive: record.positive,
        }
    }

    pub const fn field(&self) -> ObservationField {
        ObservationField::ALL[self.field_index]
    }

    pub fn next_field(&mut self) {
        self.field_index = (self.field_index + 1) % ObservationField::ALL.len();
    }

    pub fn prev_field(&mut self) {
        let len = ObservationField::ALL.len();
        self.field_index = (self.field_index + len - 1) % len;
    }

    pub const fn category(&self) -> Category {
        Category::ALL[self.category_index]
    }

    pub const fn series(&self) -> Series {
        SERIES_OPTIONS[self.series_index]
    }

    pub const fn slot(&self) -> YearSlot {
        YearSlot::ALL[self.slot_index]
    }

    pub fn cycle(&mut self, forward: bool) {
        match self.field() {
            ObservationField::Category => {
                self.category_index = step(self.category_index, Category::ALL.len(), forward);
            }
            ObservationField::Country => {
                self.series_index = step(self.series_index, SERIES_OPTIONS.len(), forward);
            }
            ObservationField::Slot => {
                self.slot_index = step(self.slot_index, YearSlot::ALL.len(), forward);
            }
            ObservationField::Positive => self.positive = !self.positive,
            _ => {}
        }
    }

    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        match self.field() {
            ObservationField::Indicator => Some(&mut self.indicator),
            ObservationField::Proxy => Some(&mut self.proxy),
            ObservationField::Year => Some(&mut self.year),
            ObservationField::Source => Some(&mut self.source),
            ObservationField::Value => Some(&mut self.value),
            ObservationField::ValueN => Some(&mut self.value_n),
            ObservationField::ValueMap => Some(&mut self.value_map),
            ObservationField::ValueStandardized => Some(&mut self.value_standardized),
            ObservationField::TableStandardized => Some(&mut self.table_standardized),
            _ => None,
        }
    }

    pub fn buffer(&self) -> Option<&str> {
        match self.field() {
            ObservationField::Indicator => Some(&self.indicator),
            ObservationField::Proxy => Some(&self.proxy),
            ObservationField::Year => Some(&self.year),
            ObservationField::Source => Some(&self.source),
            ObservationField::Value => Some(&self.value),
            ObservationField::ValueN => Some(&self.value_n),
            ObservationField::ValueMap => Some(&self.value_map),
            ObservationField::ValueStandardized => Some(&self.value_standardized),
            ObservationField::TableStandardized => Some(&self.table_standardized),
            _ => None,
        }
    }

    /// Validates the draft into a save payload.
    pub fn to_request(&self) -> Result<SaveScorecardRequest, String> {
        if self.indicator.trim().is_empty() {
            return Err("Indicator name is required".to_string());
        }
        if self.year.trim().is_empty() {
            return Err("Year is required".to_string());
        }
        let category = self.category();
        Ok(SaveScorecardRequest {
            secondary_id: self.secondary_id,
            id: self.indicator_id,
            category_id: Some(category.category_id()),
            group_name: category.label().to_string(),
            indicator: self.indicator.trim().to_string(),
            proxy: self.proxy.trim().to_string(),
            country: self.series().label().to_string(),
            year: self.year.trim().to_string(),
            year_type: Some(i64::from(self.slot().as_u8())),
            source: self.source.trim().to_string(),
            value: self.value.trim().to_string(),
            value_n: parse_optional_float("Value (numeric)", &self.value_n)?,
            value_map: non_empty(&self.value_map),
            value_standardized: parse_optional_float("Standardized", &self.value_standardized)?,
            positive: self.positive,
            value_standardized_table: parse_optional_float(
                "Standardized (table)",
                &self.table_standardized,
            )?,
        })
    }
}

/// Fields of the indicator form. The year table contributes two fields
/// per country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorField {
    Name,
    Code,
    ApiUrl,
    Dataset,
    Proxy,
    Category,
    Source,
    Notes,
    Positive,
    NumberPercent,
    Year(Country),
    Slot(Country),
}

impl IndicatorField {
    pub fn all() -> Vec<Self> {
        let mut fields = vec![
            Self::Name,
            Self::Code,
            Self::ApiUrl,
            Self::Dataset,
            Self::Proxy,
            Self::Category,
            Self::Source,
            Self::Notes,
            Self::Positive,
            Self::NumberPercent,
        ];
        for country in Country::ALL {
            fields.push(Self::Year(country));
            fields.push(Self::Slot(country));
        }
        fields
    }

    pub fn label(self) -> String {
        match self {
            Self::Name => "Indicator name".to_string(),
            Self::Code => "Indicator code".to_string(),
            Self::ApiUrl => "API URL".to_string(),
            Self::Dataset => "Dataset".to_string(),
            Self::Proxy => "Proxy".to_string(),
            Self::Category => "Category".to_string(),
            Self::Source => "Source".to_string(),
            Self::Notes => "Notes".to_string(),
            Self::Positive => "Positive indicator".to_string(),
            Self::NumberPercent => "Number (not percent)".to_string(),
            Self::Year(country) => format!("Year ({})", country.code()),
            Self::Slot(country) => format!("Slot ({})", country.code()),
        }
    }

    pub const fn cycles(self) -> bool {
        matches!(
            self,
            Self::Category | Self::Positive | Self::NumberPercent | Self::Slot(_)
        )
    }
}

/// Draft of one indicator definition being edited.
#[derive(Debug, Clone)]
pub struct EditIndicatorState {
    pub field_index: usize,
    pub editing: bool,
    pub id: i64,
    pub indicator_id: i64,
    pub name: String,
    pub code: String,
    pub api_url: String,
    pub dataset: String,
    pub proxy: String,
    pub category_index: usize,
    pub source: String,
    pub notes: String,
    pub positive: bool,
    pub number_percent: bool,
    pub years: BTreeMap<Country, String>,
    pub slots: BTreeMap<Country, Option<YearSlot>>,
}

impl EditIndicatorState {
    pub fn from_row(row: &IndicatorRow) -> Self {
        let category_index = row
            .category
            .as_deref()
            .and_then(Category::parse)
            .and_then(|category| Category::ALL.iter().position(|&c| c == category))
            .unwrap_or(0);
        let mut years = BTreeMap::new();
        let mut slots = BTreeMap::new();
        for country in Country::ALL {
            let year = row
                .years
                .get(country.code())
                .and_then(|value| value.clone())
                .unwrap_or_default();
            let slot = row
                .year_types
                .get(country.code())
                .and_then(|value| *value)
                .and_then(YearSlot::from_i64);
            years.insert(country, year);
            slots.insert(country, slot);
        }
        Self {
            field_index: 0,
            editing: false,
            id: row.id,
            indicator_id: row.indicator_id.unwrap_or(row.id),
            name: row.indicator_name.clone(),
            code: row.indicator_code.clone().unwrap_or_default(),
            api_url: row.api_url.clone().unwrap_or_default(),
            dataset: row.dataset.clone().unwrap_or_default(),
            proxy: row.proxy.clone().unwrap_or_default(),
            category_index,
            source: row.source.clone().unwrap_or_default(),
            notes: row.notes.clone().unwrap_or_default(),
            positive: row.positive_negative_indicator.unwrap_or(true),
            number_percent: row.number_percent.unwrap_or(false),
            years,
            slots,
        }
    }

    pub fn field(&self) -> IndicatorField {
        IndicatorField::all()[self.field_index]
    }

    pub fn next_field(&mut self) {
        self.field_index = (self.field_index + 1) % IndicatorField::all().len();
    }

    pub fn prev_field(&mut self) {
        let len = IndicatorField::all().len();
        self.field_index = (self.field_index + len - 1) % len;
    }

    pub const fn category(&self) -> Category {
        Category::ALL[self.category_index]
    }

    pub fn cycle(&mut self, forward: bool) {
        match self.field() {
            IndicatorField::Category => {
                self.category_index = step(self.category_index, Category::ALL.len(), forward);
            }
            IndicatorField::Positive => self.positive = !self.positive,
            IndicatorField::NumberPercent => self.number_percent = !self.number_percent,
            IndicatorField::Slot(country) => {
                // None -> 1 -> 2 -> 3 -> None.
                let current = self.slots.get(&country).copied().flatten();
                let next = match (current, forward) {
                    (None, true) => Some(YearSlot::First),
                    (Some(YearSlot::First), true) => Some(YearSlot::Second),
                    (Some(YearSlot::Second), true) => Some(YearSlot::Third),
                    (Some(YearSlot::Third), true) | (Some(YearSlot::First), false) => None,
                    (None, false) => Some(YearSlot::Third),
                    (Some(YearSlot::Second), false) => Some(YearSlot::First),
                    (Some(YearSlot::Third), false) => Some(YearSlot::Second),
                };
                self.slots.insert(country, next);
            }
            _ => {}
        }
    }

    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        match self.field() {
            IndicatorField::Name => Some(&mut self.name),
            IndicatorField::Code => Some(&mut self.code),
            IndicatorField::ApiUrl => Some(&mut self.api_url),
            IndicatorField::Dataset => Some(&mut self.dataset),
            IndicatorField::Proxy => Some(&mut self.proxy),
            IndicatorField::Source => Some(&mut self.source),
            IndicatorField::Notes => Some(&mut self.notes),
            IndicatorField::Year(country) => self.years.get_mut(&country),
            _ => None,
        }
    }

    pub fn buffer(&self) -> Option<&str> {
        match self.field() {
            IndicatorField::Name => Some(&self.name),
            IndicatorField::Code => Some(&self.code),
            IndicatorField::ApiUrl => Some(&self.api_url),
            IndicatorField::Dataset => Some(&self.dataset),
            IndicatorField::Proxy => Some(&self.proxy),
            IndicatorField::Source => Some(&self.source),
            IndicatorField::Notes => Some(&self.notes),
            IndicatorField::Year(country) => self.years.get(&country).map(String::as_str),
            _ => None,
        }
    }

    pub fn to_request(&self) -> Result<SaveIndicatorRequest, String> {
        if self.name.trim().is_empty() {
            return Err("Indicator name is required".to_string());
        }
        let mut years = BTreeMap::new();
        let mut year_types = BTreeMap::new();
        for country in Country::ALL {
            let code = country.code().to_string();
            let year = match self.years.get(&country).map(String::as_str) {
                None | Some("") => None,
                Some(text) => Some(text.trim().parse::<i64>().map_err(|_| {
                    format!("Year ({code}) must be a whole number")
                })?),
            };
            years.insert(code.clone(), year);
            year_types.insert(
                code,
                self.slots
                    .get(&country)
                    .copied()
                    .flatten()
                    .map(|slot| i64::from(slot.as_u8())),
            );
        }
        let category = self.category();
        Ok(SaveIndicatorRequest {
            id: self.id,
            indicator_id: self.indicator_id,
            api_url: self.api_url.trim().to_string(),
            dataset: self.dataset.trim().to_string(),
            indicator_code: self.code.trim().to_string(),
            indicator_name: self.name.trim().to_string(),
            positive_negative_indicator: self.positive,
            number_percent: self.number_percent,
            proxy: self.proxy.trim().to_string(),
            category: category.label().to_string(),
            category_id: Some(category.category_id()),
            source: self.source.trim().to_string(),
            notes: self.notes.trim().to_string(),
            years,
            year_types,
        })
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub dataset: Dataset,
    pub ingest: IngestStats,
    /// Flattened records for the admin list, in bucket order.
    pub records: Vec<Record>,
    pub indicator_rows: Vec<IndicatorRow>,
    pub selection: Selection,
    pub category_index: usize,
    pub sort_mode: SortMode,
    /// Derived view; rebuilt by `refresh_view`, never mutated in place.
    pub view: FilteredView,
    pub animations: AnimationSet,
    pub show_all_labels: bool,
    pub highlight: Option<Highlight>,
    pub focus: DashboardFocus,
    pub country_cursor: usize,
    pub slot_cursor: usize,
    pub table_scroll_offset: usize,
    pub status_message: String,
    pub show_help: bool,
    pub selected_record_index: usize,
    pub search_active: bool,
    pub search_input: String,
    /// Indices into `records` matching the search; empty means no filter.
    pub filtered_record_indices: Vec<usize>,
    pub indicator_cursor: usize,
    pub edit_observation: Option<EditObservationState>,
    pub edit_indicator: Option<EditIndicatorState>,
    pub pending: Option<PendingRequest>,
    /// Slot picks in the order they were made, oldest first.
    slot_history: Vec<(Country, YearSlot)>,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            screen: AppScreen::Dashboard,
            dataset: Dataset::default(),
            ingest: IngestStats::default(),
            records: Vec::new(),
            indicator_rows: Vec::new(),
            selection: Selection::new(),
            category_index: 0,
            sort_mode: SortMode::default(),
            view: FilteredView::default(),
            animations: AnimationSet::default(),
            show_all_labels: false,
            highlight: None,
            focus: DashboardFocus::Countries,
            country_cursor: 0,
            slot_cursor: 0,
            table_scroll_offset: 0,
            status_message: String::new(),
            show_help: false,
            selected_record_index: 0,
            search_active: false,
            search_input: String::new(),
            filtered_record_indices: Vec::new(),
            indicator_cursor: 0,
            edit_observation: None,
            edit_indicator: None,
            pending: None,
            slot_history: Vec::new(),
        }
    }

    pub fn load_observations(&mut self, rows: Vec<ObservationRow>, now: Instant) {
        let (dataset, ingest) = Dataset::from_rows(rows);
        self.dataset = dataset;
        self.ingest = ingest;
        self.records = self.dataset.iter().cloned().collect();
        self.selected_record_index = self
            .selected_record_index
            .min(self.records.len().saturating_sub(1));
        self.clear_search();
        self.refresh_view(now);
    }

    pub fn category_filter(&self) -> CategoryFilter {
        CategoryFilter::from_index(self.category_index).unwrap_or_default()
    }

    pub fn next_category(&mut self, now: Instant) {
        self.category_index = step(self.category_index, CategoryFilter::TABS.len(), true);
        self.refresh_view(now);
    }

    pub fn prev_category(&mut self, now: Instant) {
        self.category_index = step(self.category_index, CategoryFilter::TABS.len(), false);
        self.refresh_view(now);
    }

    pub fn toggle_sort_mode(&mut self, now: Instant) {
        self.sort_mode = self.sort_mode.toggled();
        self.refresh_view(now);
    }

    pub fn cursor_country(&self) -> Country {
        Country::from_index(self.country_cursor).unwrap_or(Country::India)
    }

    pub fn cursor_slot(&self) -> YearSlot {
        YearSlot::ALL[self.slot_cursor.min(YearSlot::ALL.len() - 1)]
    }

    pub fn toggle_country(&mut self, country: Country, now: Instant) {
        let selected = self.selection.toggle_country(country);
        if !selected {
            self.slot_history.retain(|(c, _)| *c != country);
        }
        self.refresh_view(now);
    }

    /// Toggles a slot for the cursor country, enforcing the two-slot cap
    /// by releasing the country's oldest pick.
    pub fn toggle_slot(&mut self, country: Country, slot: YearSlot, now: Instant) {
        if !self.selection.is_country_selected(country) {
            return;
        }
        if self.selection.toggle_slot(country, slot) {
            self.slot_history.push((country, slot));
            let selected: Vec<YearSlot> = self.selection.slots_for(country).collect();
            if selected.len() > MAX_SLOTS_PER_COUNTRY {
                if let Some(position) = self
                    .slot_history
                    .iter()
                    .position(|&(c, s)| c == country && s != slot)
                {
                    let (_, oldest) = self.slot_history.remove(position);
                    self.selection.deselect_slot(country, oldest);
                }
            }
        } else {
            self.slot_history.retain(|&(c, s)| !(c == country && s == slot));
        }
        self.refresh_view(now);
    }

    /// Recomputes the derived view from scratch and reconciles everything
    /// hanging off it.
    pub fn refresh_view(&mut self, now: Instant) {
        self.view = filter_view(
            &self.dataset,
            &self.selection,
            self.category_filter(),
            self.sort_mode,
        );
        self.animations
            .sync(self.view.series.iter().map(|data| data.key), now);
        self.table_scroll_offset = self
            .table_scroll_offset
            .min(self.view.indicators.len().saturating_sub(1));
        if let Some(highlight) = &self.highlight {
            let still_there = self
                .view
                .indicators
                .get(highlight.axis_index)
                .zip(self.view.series_for(highlight.key))
                .is_some_and(|(indicator, data)| data.record_for(indicator).is_some());
            if !still_there {
                self.highlight = None;
            }
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.animations.tick(now);
    }

    /// Every highlightable data point, series-major then axis order.
    pub fn markers(&self) -> Vec<Highlight> {
        let mut markers = Vec::new();
        for data in &self.view.series {
            for (axis_index, indicator) in self.view.indicators.iter().enumerate() {
                if data.record_for(indicator).is_some() {
                    markers.push(Highlight {
                        key: data.key,
                        axis_index,
                    });
                }
            }
        }
        markers
    }

    /// Moves the highlight to the next or previous data point. Any change
    /// settles the intro animation so dimming reads cleanly.
    pub fn cycle_highlight(&mut self, forward: bool) {
        let markers = self.markers();
        if markers.is_empty() {
            self.highlight = None;
            return;
        }
        let next = match &self.highlight {
            None => {
                if forward {
                    0
                } else {
                    markers.len() - 1
                }
            }
            Some(current) => {
                let position = markers.iter().position(|m| m == current).unwrap_or(0);
                step(position, markers.len(), forward)
            }
        };
        self.highlight = Some(markers[next].clone());
        self.animations.settle_all();
    }

    pub fn clear_highlight(&mut self) {
        self.highlight = None;
    }

    /// Record behind the current highlight, for the tooltip popup.
    pub fn highlighted_record(&self) -> Option<&Record> {
        let highlight = self.highlight.as_ref()?;
        let indicator = self.view.indicators.get(highlight.axis_index)?;
        self.view
            .series_for(highlight.key)?
            .record_for(indicator)
    }

    pub fn clear_search(&mut self) {
        self.search_active = false;
        self.search_input.clear();
        self.filtered_record_indices.clear();
    }

    /// Fuzzy-filters the admin list against the search input.
    pub fn update_search(&mut self) {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        self.filtered_record_indices.clear();
        if self.search_input.is_empty() {
            return;
        }
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, usize)> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let haystack = format!(
                    "{} {} {}",
                    record.indicator,
                    record.series.label(),
                    record.category.label()
                );
                matcher
                    .fuzzy_match(&haystack, &self.search_input)
                    .map(|score| (score, index))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        self.filtered_record_indices = scored.into_iter().map(|(_, index)| index).collect();
        self.selected_record_index = 0;
    }

    /// Rows the admin list shows: search matches, or everything.
    pub fn visible_record_indices(&self) -> Vec<usize> {
        if self.filtered_record_indices.is_empty() && self.search_input.is_empty() {
            (0..self.records.len()).collect()
        } else {
            self.filtered_record_indices.clone()
        }
    }

    pub fn selected_record(&self) -> Option<&Record> {
        let visible = self.visible_record_indices();
        visible
            .get(self.selected_record_index)
            .and_then(|&index| self.records.get(index))
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

const fn step(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

fn format_float(value: f64) -> String {
    format!("{value}")
}

fn parse_optional_float(label: &str, text: &str) -> Result<Option<f64>, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("{label} must be a number"))
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorecard::store::fixtures::row;

    fn loaded_app() -> App {
        let mut app = App::new();
        app.load_observations(
            vec![
                row(1, "Vision", "India", 1, "GDP", Some(80.0)),
                row(2, "Vision", "India", 2, "GDP", Some(70.0)),
                row(3, "Vision", "India", 3, "GDP", Some(60.0)),
                row(4, "Vision", "Nepal", 1, "GDP", Some(50.0)),
            ],
            Instant::now(),
        );
        app
    }

    #[test]
    fn default_tab_is_vision() {
        let app = App::new();
        assert_eq!(
            app.category_filter(),
            CategoryFilter::Single(Category::Vision)
        );
    }

    #[test]
    fn third_slot_pick_releases_the_oldest() {
        let mut app = loaded_app();
        let now = Instant::now();
        app.toggle_country(Country::India, now);
        app.toggle_slot(Country::India, YearSlot::First, now);
        app.toggle_slot(Country::India, YearSlot::Second, now);
        app.toggle_slot(Country::India, YearSlot::Third, now);

        assert!(!app.selection.is_slot_selected(Country::India, YearSlot::First));
        assert!(app.selection.is_slot_selected(Country::India, YearSlot::Second));
        assert!(app.selection.is_slot_selected(Country::India, YearSlot::Third));
    }

    #[test]
    fn deselecting_country_forgets_slot_history() {
        let mut app = loaded_app();
        let now = Instant::now();
        app.toggle_country(Country::India, now);
        app.toggle_slot(Country::India, YearSlot::First, now);
        app.toggle_country(Country::India, now);
        app.toggle_country(Country::India, now);

        // Fresh selection: picking two new slots must not evict either.
        app.toggle_slot(Country::India, YearSlot::Second, now);
        app.toggle_slot(Country::India, YearSlot::Third, now);
        assert!(app.selection.is_slot_selected(Country::India, YearSlot::Second));
        assert!(app.selection.is_slot_selected(Country::India, YearSlot::Third));
    }

    #[test]
    fn highlight_cycles_markers_and_survives_only_valid_refreshes() {
        let mut app = loaded_app();
        let now = Instant::now();
        app.toggle_country(Country::India, now);
        app.toggle_slot(Country::India, YearSlot::First, now);
        app.toggle_country(Country::Nepal, now);
        app.toggle_slot(Country::Nepal, YearSlot::First, now);

        app.cycle_highlight(true);
        assert!(app.highlight.is_some());
        assert!(app.highlighted_record().is_some());
        assert!(app.animations.all_settled());

        // Selection change that removes the highlighted series drops it.
        let highlighted = app.highlight.clone().expect("highlight");
        if let Series::Country(country) = highlighted.key.series {
            app.toggle_country(country, now);
            assert!(app.highlight.is_none());
        }
    }

    #[test]
    fn search_filters_admin_list() {
        let mut app = loaded_app();
        app.search_input = "nepal".to_string();
        app.update_search();
        assert_eq!(app.filtered_record_indices.len(), 1);
        let record = app.selected_record().expect("match");
        assert_eq!(record.series, Series::Country(Country::Nepal));

        app.clear_search();
        assert_eq!(app.visible_record_indices().len(), 4);
    }

    #[test]
    fn observation_form_round_trips_a_record() {
        let app = loaded_app();
        let record = app.records.first().expect("record");
        let state = EditObservationState::from_record(record);
        let request = state.to_request().expect("valid");
        assert_eq!(request.secondary_id, Some(record.secondary_id));
        assert_eq!(request.indicator, record.indicator);
        assert_eq!(request.country, record.series.label());
        assert_eq!(request.year_type, Some(i64::from(record.slot.as_u8())));
        assert_eq!(request.value_standardized, Some(record.standardized));
    }

    #[test]
    fn observation_edit_keeps_the_numeric_value_column() {
        let mut source = row(1, "Vision", "India", 1, "GDP", Some(80.0));
        source.value_n = Some("2388.0".to_string());
        let (dataset, _) = Dataset::from_rows(vec![source]);
        let record = dataset.iter().next().expect("record");

        let state = EditObservationState::from_record(record);
        assert_eq!(state.value_n, "2388.0");
        let request = state.to_request().expect("valid");
        assert_eq!(request.value_n, Some(2388.0));
    }

    #[test]
    fn observation_form_rejects_bad_numbers_and_blank_required_fields() {
        let mut state = EditObservationState::blank();
        assert!(state.to_request().is_err());

        state.indicator = "GDP".to_string();
        state.year = "2022".to_string();
        state.value_standardized = "eighty".to_string();
        let error = state.to_request().expect_err("bad float");
        assert!(error.contains("Standardized"));

        state.value_standardized = "80.5".to_string();
        let request = state.to_request().expect("valid");
        assert!(request.secondary_id.is_none());
        assert_eq!(request.value_standardized, Some(80.5));
    }

    #[test]
    fn indicator_form_builds_year_tables_by_country_code() {
        // Backend-shaped year tables: NEP and LAK, not the ISO codes.
        let row: IndicatorRow = serde_json::from_str(
            r#"{
                "ID": 3, "IndicatorName": "GDP per capita",
                "Category": "Vision",
                "Years": {"IND": "2022", "NEP": "2019", "LAK": null},
                "Year_Types": {"IND": 1, "NEP": 2}
            }"#,
        )
        .expect("decode");
        let state = EditIndicatorState::from_row(&row);
        assert_eq!(state.years.get(&Country::India).map(String::as_str), Some("2022"));
        assert_eq!(state.years.get(&Country::Nepal).map(String::as_str), Some("2019"));
        assert_eq!(
            state.slots.get(&Country::India).copied().flatten(),
            Some(YearSlot::First)
        );
        assert_eq!(
            state.slots.get(&Country::Nepal).copied().flatten(),
            Some(YearSlot::Second)
        );

        let request = state.to_request().expect("valid");
        assert_eq!(request.years.get("IND"), Some(&Some(2022)));
        assert_eq!(request.years.get("NEP"), Some(&Some(2019)));
        assert_eq!(request.years.get("LAK"), Some(&None));
        assert_eq!(request.year_types.get("IND"), Some(&Some(1)));
        assert_eq!(request.year_types.get("NEP"), Some(&Some(2)));
        assert_eq!(request.year_types.get("PAK"), Some(&None));
        assert_eq!(request.category_id, Some(4));

        let mut state = state;
        state.years.insert(Country::Bhutan, "next year".to_string());
        assert!(state.to_request().is_err());
    }

    #[test]
    fn slot_field_cycles_through_blank() {
        let row: IndicatorRow =
            serde_json::from_str(r#"{"ID": 1, "IndicatorName": "GDP"}"#).expect("decode");
        let mut state = EditIndicatorState::from_row(&row);
        state.field_index = IndicatorField::all()
            .iter()
            .position(|&field| field == IndicatorField::Slot(Country::India))
            .expect("slot field");

        let read = |state: &EditIndicatorState| state.slots.get(&Country::India).copied().flatten();
        assert_eq!(read(&state), None);
        state.cycle(true);
        assert_eq!(read(&state), Some(YearSlot::First));
        state.cycle(true);
        state.cycle(true);
        assert_eq!(read(&state), Some(YearSlot::Third));
        state.cycle(true);
        assert_eq!(read(&state), None);
        state.cycle(false);
        assert_eq!(read(&state), Some(YearSlot::Third));
    }
}
