use crate::app::state::{App, AppScreen, EditIndicatorState};
use crossterm::event::KeyCode;

pub fn handle_indicators_input(app: &mut App, key: KeyCode) {
    let total_rows = app.indicator_rows.len();

    match key {
        KeyCode::Esc => {
            app.screen = AppScreen::Observations;
        }
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Enter => {
            if let Some(row) = app.indicator_rows.get(app.indicator_cursor) {
                app.edit_indicator = Some(EditIndicatorState::from_row(row));
                app.screen = AppScreen::EditIndicator;
            }
        }
        KeyCode::Up => {
            app.indicator_cursor = app.indicator_cursor.saturating_sub(1);
        }
        KeyCode::Down => {
            if total_rows > 0 && app.indicator_cursor + 1 < total_rows {
                app.indicator_cursor += 1;
            }
        }
        KeyCode::Home => {
            app.indicator_cursor = 0;
        }
        KeyCode::End => {
            if total_rows > 0 {
                app.indicator_cursor = total_rows - 1;
            }
        }
        _ => {}
    }
}
