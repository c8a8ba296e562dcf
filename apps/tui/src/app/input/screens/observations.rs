use crate::app::state::{App, AppScreen, EditObservationState, PendingRequest};
use crossterm::event::KeyCode;

pub fn handle_observations_input(app: &mut App, key: KeyCode) {
    if app.search_active {
        handle_search_input(app, key);
        return;
    }

    let total_rows = app.visible_record_indices().len();

    match key {
        KeyCode::Esc => {
            if !app.search_input.is_empty() {
                app.clear_search();
            } else {
                app.screen = AppScreen::Dashboard;
            }
        }
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Char('/') => {
            app.search_active = true;
        }
        KeyCode::Enter => {
            if let Some(record) = app.selected_record() {
                app.edit_observation = Some(EditObservationState::from_record(record));
                app.screen = AppScreen::EditObservation;
            }
        }
        KeyCode::Char('n') => {
            app.edit_observation = Some(EditObservationState::blank());
            app.screen = AppScreen::EditObservation;
        }
        KeyCode::Char('i') => {
            if app.pending.is_none() {
                app.pending = Some(PendingRequest::FetchIndicators);
            }
        }
        KeyCode::Up => {
            app.selected_record_index = app.selected_record_index.saturating_sub(1);
        }
        KeyCode::Down => {
            if total_rows > 0 && app.selected_record_index + 1 < total_rows {
                app.selected_record_index += 1;
            }
        }
        KeyCode::PageUp => {
            app.selected_record_index = app.selected_record_index.saturating_sub(5);
        }
        KeyCode::PageDown => {
            if total_rows > 0 {
                app.selected_record_index = (app.selected_record_index + 5).min(total_rows - 1);
            }
        }
        KeyCode::Home => {
            app.selected_record_index = 0;
        }
        KeyCode::End => {
            if total_rows > 0 {
                app.selected_record_index = total_rows - 1;
            }
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.clear_search();
        }
        KeyCode::Enter => {
            // Keep the filter, return the arrows to the list.
            app.search_active = false;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            app.update_search();
        }
        KeyCode::Char(ch) => {
            app.search_input.push(ch);
            app.update_search();
        }
        _ => {}
    }
}
