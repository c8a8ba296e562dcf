// UI rendering for the scorecard dashboard.

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    match app.screen {
        AppScreen::Dashboard => screens::dashboard::render_dashboard(app, f),
        AppScreen::Observations => screens::observations::render_observations(app, f),
        AppScreen::Indicators => screens::indicators::render_indicators(app, f),
        AppScreen::EditObservation => screens::edit_observation::render_edit_observation(app, f),
        AppScreen::EditIndicator => screens::edit_indicator::render_edit_indicator(app, f),
    }

    if app.show_help {
        screens::help::render_help(f);
    }
}
