use crate::app::state::{App, AppScreen, DashboardFocus, PendingRequest};
use crate::domain::{Country, YearSlot};
use crossterm::event::KeyCode;
use std::time::Instant;

pub fn handle_dashboard_input(app: &mut App, key: KeyCode, now: Instant) {
    match key {
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Esc => {
            app.clear_highlight();
        }
        KeyCode::Left => {
            app.prev_category(now);
        }
        KeyCode::Right => {
            app.next_category(now);
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                DashboardFocus::Countries => DashboardFocus::Slots,
                DashboardFocus::Slots => DashboardFocus::Table,
                DashboardFocus::Table => DashboardFocus::Countries,
            };
        }
        KeyCode::Up => move_cursor(app, false),
        KeyCode::Down => move_cursor(app, true),
        KeyCode::Enter | KeyCode::Char(' ') => toggle_under_cursor(app, now),
        KeyCode::Char('s') => {
            app.toggle_sort_mode(now);
        }
        KeyCode::Char('a') => {
            app.show_all_labels = !app.show_all_labels;
        }
        KeyCode::Char('.') => {
            app.cycle_highlight(true);
        }
        KeyCode::Char(',') => {
            app.cycle_highlight(false);
        }
        KeyCode::Char('o') => {
            app.screen = AppScreen::Observations;
        }
        KeyCode::Char('r') => {
            if app.pending.is_none() {
                app.pending = Some(PendingRequest::Reload);
            }
        }
        _ => {}
    }
}

fn move_cursor(app: &mut App, down: bool) {
    match app.focus {
        DashboardFocus::Countries => {
            let len = Country::ALL.len();
            app.country_cursor = if down {
                (app.country_cursor + 1) % len
            } else {
                (app.country_cursor + len - 1) % len
            };
            app.slot_cursor = 0;
        }
        DashboardFocus::Slots => {
            let len = YearSlot::ALL.len();
            app.slot_cursor = if down {
                (app.slot_cursor + 1) % len
            } else {
                (app.slot_cursor + len - 1) % len
            };
        }
        DashboardFocus::Table => {
            if down {
                let max = app.view.indicators.len().saturating_sub(1);
                app.table_scroll_offset = (app.table_scroll_offset + 1).min(max);
            } else {
                app.table_scroll_offset = app.table_scroll_offset.saturating_sub(1);
            }
        }
    }
}

fn toggle_under_cursor(app: &mut App, now: Instant) {
    match app.focus {
        DashboardFocus::Countries => {
            let country = app.cursor_country();
            app.toggle_country(country, now);
        }
        DashboardFocus::Slots => {
            let country = app.cursor_country();
            let slot = app.cursor_slot();
            app.toggle_slot(country, slot, now);
        }
        DashboardFocus::Table => {}
    }
}
