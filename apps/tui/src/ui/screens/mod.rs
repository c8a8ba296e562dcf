pub mod dashboard;
pub mod edit_indicator;
pub mod edit_observation;
pub mod help;
pub mod indicators;
pub mod observations;
