use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;
use std::time::Instant;

mod dashboard;
mod edit_indicator;
mod edit_observation;
mod help;
mod indicators;
mod observations;

pub fn dispatch_input(app: &mut App, key: KeyCode, now: Instant) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    match app.screen {
        AppScreen::Dashboard => dashboard::handle_dashboard_input(app, key, now),
        AppScreen::Observations => observations::handle_observations_input(app, key),
        AppScreen::Indicators => indicators::handle_indicators_input(app, key),
        AppScreen::EditObservation => edit_observation::handle_edit_observation_input(app, key),
        AppScreen::EditIndicator => edit_indicator::handle_edit_indicator_input(app, key),
    }
}
