use crate::app::state::{App, AppScreen, PendingRequest};
use crossterm::event::KeyCode;

pub fn handle_edit_observation_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            if let Some(state) = &mut app.edit_observation {
                if state.editing {
                    state.editing = false;
                    return;
                }
            }
            app.screen = AppScreen::Observations;
            app.edit_observation = None;
        }
        KeyCode::Up => {
            if let Some(state) = &mut app.edit_observation {
                if !state.editing {
                    state.prev_field();
                }
            }
        }
        KeyCode::Down => {
            if let Some(state) = &mut app.edit_observation {
                if !state.editing {
                    state.next_field();
                }
            }
        }
        KeyCode::Left => {
            if let Some(state) = &mut app.edit_observation {
                if state.field().cycles() {
                    state.cycle(false);
                }
            }
        }
        KeyCode::Right => {
            if let Some(state) = &mut app.edit_observation {
                if state.field().cycles() {
                    state.cycle(true);
                }
            }
        }
        KeyCode::Enter => {
            if let Some(state) = &mut app.edit_observation {
                if !state.field().cycles() {
                    state.editing = !state.editing;
                }
            }
        }
        KeyCode::Char('s') if !is_editing(app) => {
            save_observation(app);
        }
        KeyCode::Backspace => {
            if let Some(state) = &mut app.edit_observation {
                if state.editing {
                    if let Some(buffer) = state.buffer_mut() {
                        buffer.pop();
                    }
                }
            }
        }
        KeyCode::Char(ch) => {
            if let Some(state) = &mut app.edit_observation {
                if state.editing {
                    if let Some(buffer) = state.buffer_mut() {
                        buffer.push(ch);
                    }
                }
            }
        }
        _ => {}
    }
}

fn is_editing(app: &App) -> bool {
    app.edit_observation
        .as_ref()
        .is_some_and(|state| state.editing)
}

fn save_observation(app: &mut App) {
    let Some(state) = &app.edit_observation else {
        return;
    };
    if app.pending.is_some() {
        app.status_message = "A save is already in progress".to_string();
        return;
    }
    match state.to_request() {
        Ok(request) => {
            app.pending = Some(PendingRequest::SaveObservation(request));
        }
        Err(error) => {
            app.status_message = error;
        }
    }
}
