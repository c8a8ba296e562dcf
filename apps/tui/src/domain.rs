use ratatui::style::Color;

/// Top-level indicator grouping used by the scorecard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    People,
    Prosperity,
    Planet,
    Vision,
    Infrastructure,
    Digital,
    CrossCutting,
}

impl Category {
    pub const ALL: [Self; 7] = [
        Self::People,
        Self::Prosperity,
        Self::Planet,
        Self::Vision,
        Self::Infrastructure,
        Self::Digital,
        Self::CrossCutting,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::People => "People",
            Self::Prosperity => "Prosperity",
            Self::Planet => "Planet",
            Self::Vision => "Vision",
            Self::Infrastructure => "Infrastructure",
            Self::Digital => "Digital",
            Self::CrossCutting => "Cross Cutting",
        }
    }

    /// Stable identifier used by the backend (`category_id` column).
    pub const fn category_id(self) -> i64 {
        match self {
            Self::People => 1,
            Self::Prosperity => 2,
            Self::Planet => 3,
            Self::Vision => 4,
            Self::Infrastructure => 5,
            Self::Digital => 6,
            Self::CrossCutting => 7,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "people" => Some(Self::People),
            "prosperity" => Some(Self::Prosperity),
            "planet" => Some(Self::Planet),
            "vision" => Some(Self::Vision),
            "infrastructure" => Some(Self::Infrastructure),
            "digital" => Some(Self::Digital),
            "cross cutting" | "cross-cutting" => Some(Self::CrossCutting),
            _ => None,
        }
    }
}

/// What the category tab row selects: a single category, or the combined
/// view that merges three of them onto one radar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Single(Category),
    ProsperityDigitalInfrastructure,
}

impl CategoryFilter {
    pub const TABS: [Self; 8] = [
        Self::Single(Category::Vision),
        Self::Single(Category::People),
        Self::Single(Category::Prosperity),
        Self::Single(Category::Planet),
        Self::Single(Category::Infrastructure),
        Self::Single(Category::Digital),
        Self::Single(Category::CrossCutting),
        Self::ProsperityDigitalInfrastructure,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Single(category) => category.label(),
            Self::ProsperityDigitalInfrastructure => "Prosperity, Digital, and Infrastructure",
        }
    }

    /// The categories whose records this filter admits.
    pub const fn categories(self) -> &'static [Category] {
        match self {
            Self::Single(Category::People) => &[Category::People],
            Self::Single(Category::Prosperity) => &[Category::Prosperity],
            Self::Single(Category::Planet) => &[Category::Planet],
            Self::Single(Category::Vision) => &[Category::Vision],
            Self::Single(Category::Infrastructure) => &[Category::Infrastructure],
            Self::Single(Category::Digital) => &[Category::Digital],
            Self::Single(Category::CrossCutting) => &[Category::CrossCutting],
            Self::ProsperityDigitalInfrastructure => {
                &[Category::Digital, Category::Infrastructure, Category::Prosperity]
            }
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::TABS.len() {
            Some(Self::TABS[index])
        } else {
            None
        }
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::Single(Category::Vision)
    }
}

/// The eight scorecard countries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Country {
    India,
    Pakistan,
    Bangladesh,
    SriLanka,
    Nepal,
    Bhutan,
    Afghanistan,
    Maldives,
}

impl Country {
    pub const ALL: [Self; 8] = [
        Self::India,
        Self::Pakistan,
        Self::Bangladesh,
        Self::SriLanka,
        Self::Nepal,
        Self::Bhutan,
        Self::Afghanistan,
        Self::Maldives,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::India => "India",
            Self::Pakistan => "Pakistan",
            Self::Bangladesh => "Bangladesh",
            Self::SriLanka => "Sri Lanka",
            Self::Nepal => "Nepal",
            Self::Bhutan => "Bhutan",
            Self::Afghanistan => "Afghanistan",
            Self::Maldives => "Maldives",
        }
    }

    /// Three-letter code keying the backend's indicator year tables.
    /// NEP and LAK are what the backend uses, not the ISO codes.
    pub const fn code(self) -> &'static str {
        match self {
            Self::India => "IND",
            Self::Pakistan => "PAK",
            Self::Bangladesh => "BAN",
            Self::SriLanka => "LAK",
            Self::Nepal => "NEP",
            Self::Bhutan => "BHU",
            Self::Afghanistan => "AFG",
            Self::Maldives => "MLD",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "india" | "ind" => Some(Self::India),
            "pakistan" | "pak" => Some(Self::Pakistan),
            "bangladesh" | "ban" => Some(Self::Bangladesh),
            "sri lanka" | "lka" | "lak" => Some(Self::SriLanka),
            "nepal" | "npl" | "nep" => Some(Self::Nepal),
            "bhutan" | "bhu" => Some(Self::Bhutan),
            "afghanistan" | "afg" => Some(Self::Afghanistan),
            "maldives" | "mld" => Some(Self::Maldives),
            _ => None,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Flag-derived base color for this country's series.
    pub const fn color(self) -> Color {
        match self {
            Self::India => Color::Rgb(238, 90, 28),
            Self::Pakistan => Color::Rgb(17, 87, 64),
            Self::Bangladesh => Color::Rgb(211, 12, 184),
            Self::SriLanka => Color::Rgb(141, 21, 58),
            Self::Nepal => Color::Rgb(0, 56, 147),
            Self::Bhutan => Color::Rgb(255, 204, 0),
            Self::Afghanistan => Color::Rgb(0, 0, 0),
            Self::Maldives => Color::Rgb(0, 187, 221),
        }
    }
}

/// Regional pseudo-countries shown for comparison but never ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Aggregate {
    SouthAsia,
    SouthAsiaExclIndia,
}

impl Aggregate {
    pub const ALL: [Self; 2] = [Self::SouthAsia, Self::SouthAsiaExclIndia];

    pub const fn label(self) -> &'static str {
        match self {
            Self::SouthAsia => "South Asia Region",
            Self::SouthAsiaExclIndia => "South Asia Region (excluding India)",
        }
    }

    pub const fn short_label(self) -> &'static str {
        match self {
            Self::SouthAsia => "SAR",
            Self::SouthAsiaExclIndia => "SAR excl. India",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "south asia region" | "south asia" | "sar" => Some(Self::SouthAsia),
            "south asia region (excluding india)"
            | "south asia region excluding india"
            | "south asia region wo india"
            | "sar excl. india"
            | "sar_wo_india" => Some(Self::SouthAsiaExclIndia),
            _ => None,
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Self::SouthAsia => Color::Rgb(96, 96, 112),
            Self::SouthAsiaExclIndia => Color::Rgb(144, 144, 160),
        }
    }
}

/// The owner of one radar polygon: a country or a regional aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Series {
    Country(Country),
    Aggregate(Aggregate),
}

impl Series {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Country(country) => country.label(),
            Self::Aggregate(aggregate) => aggregate.label(),
        }
    }

    pub const fn country(self) -> Option<Country> {
        match self {
            Self::Country(country) => Some(country),
            Self::Aggregate(_) => None,
        }
    }

    pub const fn is_aggregate(self) -> bool {
        matches!(self, Self::Aggregate(_))
    }

    pub fn parse(value: &str) -> Option<Self> {
        Country::parse(value)
            .map(Self::Country)
            .or_else(|| Aggregate::parse(value).map(Self::Aggregate))
    }

    pub const fn base_color(self) -> Color {
        match self {
            Self::Country(country) => country.color(),
            Self::Aggregate(aggregate) => aggregate.color(),
        }
    }
}

/// Ordinal recency slot distinguishing repeated measurements of an
/// indicator for a country. Not a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum YearSlot {
    First,
    Second,
    Third,
}

impl YearSlot {
    pub const ALL: [Self; 3] = [Self::First, Self::Second, Self::Third];

    pub const fn as_u8(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }

    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "Year 1",
            Self::Second => "Year 2",
            Self::Third => "Year 3",
        }
    }
}

/// Recency shading for a series polygon: the base color blended toward
/// white, most for slot 1, matching the original opacity ramp
/// `0.1 + slot * 0.3`.
pub fn series_color(series: Series, slot: YearSlot) -> Color {
    let toward_white = match slot {
        YearSlot::First => 0.6,
        YearSlot::Second => 0.3,
        YearSlot::Third => 0.0,
    };
    blend_toward_white(series.base_color(), toward_white)
}

fn blend_toward_white(color: Color, amount: f64) -> Color {
    let Color::Rgb(r, g, b) = color else {
        return color;
    };
    let mix = |channel: u8| -> u8 {
        let blended = f64::from(channel) + (255.0 - f64::from(channel)) * amount;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            blended.round().clamp(0.0, 255.0) as u8
        }
    };
    Color::Rgb(mix(r), mix(g), mix(b))
}

/// Dimmed rendition of a series color while another series is highlighted.
pub fn dimmed_color(color: Color) -> Color {
    let Color::Rgb(r, g, b) = color else {
        return Color::DarkGray;
    };
    Color::Rgb(r / 3 + 40, g / 3 + 40, b / 3 + 40)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_filter_combined_merges_three_groups() {
        let merged = CategoryFilter::ProsperityDigitalInfrastructure.categories();
        assert_eq!(
            merged,
            &[Category::Digital, Category::Infrastructure, Category::Prosperity]
        );
        assert_eq!(
            CategoryFilter::Single(Category::Vision).categories(),
            &[Category::Vision]
        );
    }

    #[test]
    fn series_parse_routes_aggregates() {
        assert_eq!(Series::parse("India"), Some(Series::Country(Country::India)));
        assert_eq!(
            Series::parse("South Asia Region"),
            Some(Series::Aggregate(Aggregate::SouthAsia))
        );
        assert_eq!(Series::parse("Atlantis"), None);
    }

    #[test]
    fn country_codes_match_backend_year_table_keys() {
        assert_eq!(Country::Nepal.code(), "NEP");
        assert_eq!(Country::SriLanka.code(), "LAK");
        for country in Country::ALL {
            assert_eq!(Country::parse(country.code()), Some(country));
        }
    }

    #[test]
    fn year_slot_round_trips() {
        for slot in YearSlot::ALL {
            assert_eq!(YearSlot::from_u8(slot.as_u8()), Some(slot));
        }
        assert_eq!(YearSlot::from_u8(0), None);
        assert_eq!(YearSlot::from_u8(4), None);
    }

    #[test]
    fn recency_shading_lightens_slot_one_most() {
        let base = Country::Nepal.color();
        let slot_three = series_color(Series::Country(Country::Nepal), YearSlot::Third);
        let slot_one = series_color(Series::Country(Country::Nepal), YearSlot::First);
        assert_eq!(slot_three, base);
        let (Color::Rgb(r1, ..), Color::Rgb(r3, ..)) = (slot_one, slot_three) else {
            panic!("expected rgb colors");
        };
        assert!(r1 > r3);
    }
}
