pub mod filter;
pub mod layout;
pub mod radar;
pub mod store;

pub use filter::{filter_view, FilteredView, RankEntry, Rankings, Selection, SeriesKey, SortMode};
pub use store::{Dataset, IngestStats, Record};
