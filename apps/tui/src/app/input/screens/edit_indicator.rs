use crate::app::state::{App, AppScreen, PendingRequest};
use crossterm::event::KeyCode;

pub fn handle_edit_indicator_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            if let Some(state) = &mut app.edit_indicator {
                if state.editing {
                    state.editing = false;
                    return;
                }
            }
            app.screen = AppScreen::Indicators;
            app.edit_indicator = None;
        }
        KeyCode::Up => {
            if let Some(state) = &mut app.edit_indicator {
                if !state.editing {
                    state.prev_field();
                }
            }
        }
        KeyCode::Down => {
            if let Some(state) = &mut app.edit_indicator {
                if !state.editing {
                    state.next_field();
                }
            }
        }
        KeyCode::Left => {
            if let Some(state) = &mut app.edit_indicator {
                if state.field().cycles() {
                    state.cycle(false);
                }
            }
        }
        KeyCode::Right => {
            if let Some(state) = &mut app.edit_indicator {
                if state.field().cycles() {
                    state.cycle(true);
                }
            }
        }
        KeyCode::Enter => {
            if let Some(state) = &mut app.edit_indicator {
                if !state.field().cycles() {
                    state.editing = !state.editing;
                }
            }
        }
        KeyCode::Char('s') if !is_editing(app) => {
            save_indicator(app);
        }
        KeyCode::Backspace => {
            if let Some(state) = &mut app.edit_indicator {
                if state.editing {
                    if let Some(buffer) = state.buffer_mut() {
                        buffer.pop();
                    }
                }
            }
        }
        KeyCode::Char(ch) => {
            if let Some(state) = &mut app.edit_indicator {
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
    app.edit_indicator
        .as_ref()
        .is_some_and(|state| state.editing)
}

fn save_indicator(app: &mut App) {
    let Some(state) = &app.edit_indicator else {
        return;
    };
    if app.pending.is_some() {
        app.status_message = "A save is already in progress".to_string();
        return;
    }
    match state.to_request() {
        Ok(request) => {
            app.pending = Some(PendingRequest::SaveIndicator(request));
        }
        Err(error) => {
            app.status_message = error;
        }
    }
}
