use color_eyre::Result;
use crossterm::event::{self, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::convert::TryFrom;
use std::fmt;
use std::io::Stdout;
use std::time::Instant;

use crate::app::state::PendingRequest;
use crate::app::{handle_input, App, AppActions, AppScreen};
use crate::domain::{Category, Country, YearSlot};
use crate::scorecard::{Dataset, IngestStats};
use crate::ui;

// States for the backend save flow
#[derive(Clone, Copy, PartialEq, Debug)]
enum SaveState {
    Idle,
    Saving,
    Success,
    Error,
}

impl fmt::Display for SaveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Saving => write!(f, "Saving"),
            Self::Success => write!(f, "Success"),
            Self::Error => write!(f, "Error"),
        }
    }
}

#[derive(Clone, Debug)]
enum SaveEvent {
    Start,
    Success(String),
    Error(String),
    Reset,
}

impl fmt::Display for SaveEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Success(message) => write!(f, "Success({message})"),
            Self::Error(message) => write!(f, "Error({message})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
struct StateTransitionError {
    from: SaveState,
    event: SaveEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

// State machine driving one backend write at a time
struct SaveMachine {
    state: SaveState,
}

impl SaveMachine {
    const fn new(initial_state: SaveState) -> Self {
        Self {
            state: initial_state,
        }
    }

    const fn state(&self) -> SaveState {
        self.state
    }

    fn process_event(
        &mut self,
        event: &SaveEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        self.state = next_state.0;
        Ok(())
    }
}

struct NextState(SaveState);

impl NextState {
    const fn new(state: SaveState) -> Self {
        Self(state)
    }
}

impl SaveState {
    const fn next_state(self) -> NextState {
        NextState::new(self)
    }
}

impl TryFrom<(SaveState, &SaveEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (SaveState, &SaveEvent, &mut App),
    ) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (SaveState::Idle, SaveEvent::Start) => {
                app.status_message = "Saving...".to_string();
                Ok(SaveState::Saving.next_state())
            }
            (SaveState::Saving, SaveEvent::Success(message)) => {
                app.status_message.clone_from(message);
                // The form closes; the list screen shows the outcome.
                match app.screen {
                    AppScreen::EditObservation => {
                        app.edit_observation = None;
                        app.screen = AppScreen::Observations;
                    }
                    AppScreen::EditIndicator => {
                        app.edit_indicator = None;
                        app.screen = AppScreen::Indicators;
                    }
                    _ => {}
                }
                Ok(SaveState::Success.next_state())
            }
            (SaveState::Saving, SaveEvent::Error(error)) => {
                // The form stays open with the draft intact.
                app.status_message = format!("Error: {error}");
                Ok(SaveState::Error.next_state())
            }
            (SaveState::Success | SaveState::Error, SaveEvent::Reset) => {
                Ok(SaveState::Idle.next_state())
            }
            _ => Err(StateTransitionError {
                from: current_state,
                event: event.clone(),
            }),
        }
    }
}

/// Run the application in headless mode (no UI): fetch the dataset, print
/// stats, exit.
pub async fn run_headless(actions: &AppActions, json: bool) -> Result<()> {
    let rows = actions.fetch_observations().await?;
    let (dataset, ingest) = Dataset::from_rows(rows);
    let stats = build_headless_stats(&dataset, ingest);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }

    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nScorecard Dataset Stats");
    println!("=======================");
    println!("Records kept: {}", stats.kept);
    println!("Dropped (no usable value): {}", stats.dropped_value);
    println!("Dropped (unknown keys): {}", stats.dropped_key);
    println!("Distinct indicators: {}", stats.indicators);

    println!("\nRecords by Category:");
    for (category, count) in &stats.by_category {
        println!("- {category}: {count}");
    }

    println!("\nRecords by Country:");
    for (country, count) in &stats.by_country {
        println!("- {country}: {count}");
    }

    println!("\nRecords by Year Slot:");
    for (slot, count) in &stats.by_slot {
        println!("- {slot}: {count}");
    }
}

fn build_headless_stats(dataset: &Dataset, ingest: IngestStats) -> HeadlessStats {
    let by_category = Category::ALL
        .iter()
        .map(|&category| {
            let count = dataset
                .iter()
                .filter(|record| record.category == category)
                .count();
            (category.label().to_string(), count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();

    let by_country = Country::ALL
        .iter()
        .map(|&country| {
            let count = dataset
                .iter()
                .filter(|record| record.series.country() == Some(country))
                .count();
            (country.label().to_string(), count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();

    let by_slot = YearSlot::ALL
        .iter()
        .map(|&slot| {
            let count = dataset.iter().filter(|record| record.slot == slot).count();
            (slot.label().to_string(), count)
        })
        .collect();

    HeadlessStats {
        kept: ingest.kept,
        dropped_value: ingest.dropped_value,
        dropped_key: ingest.dropped_key,
        indicators: dataset.indicators().len(),
        by_category,
        by_country,
        by_slot,
    }
}

#[derive(serde::Serialize)]
struct HeadlessStats {
    kept: usize,
    dropped_value: usize,
    dropped_key: usize,
    indicators: usize,
    by_category: Vec<(String, usize)>,
    by_country: Vec<(String, usize)>,
    by_slot: Vec<(String, usize)>,
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    actions: &AppActions,
) -> Result<()> {
    // Event poll timeout (ms); also paces the animation ticks
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut save_machine = SaveMachine::new(SaveState::Idle);

    loop {
        app.tick(Instant::now());

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    handle_input(app, key.code, Instant::now());
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_))
                | Err(_) => {
                    // Ignore non-key events for now
                }
            }
        }

        if let Some(request) = app.pending.take() {
            if save_machine.state() == SaveState::Idle {
                drive_request(&mut save_machine, request, app, actions, terminal).await;
            }
        }
    }
    Ok(())
}

async fn drive_request(
    save_machine: &mut SaveMachine,
    request: PendingRequest,
    app: &mut App,
    actions: &AppActions,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) {
    if save_machine.process_event(&SaveEvent::Start, app).is_err() {
        return;
    }

    let outcome = match &request {
        PendingRequest::SaveObservation(payload) => {
            actions.save_observation(payload).await.map(Some)
        }
        PendingRequest::SaveIndicator(payload) => actions.save_indicator(payload).await.map(Some),
        PendingRequest::Reload => actions.fetch_observations().await.map(|rows| {
            app.load_observations(rows, Instant::now());
            Some(format!("Loaded {} records", app.ingest.kept))
        }),
        PendingRequest::FetchIndicators => actions.fetch_indicators().await.map(|rows| {
            app.indicator_rows = rows;
            app.indicator_cursor = 0;
            app.screen = AppScreen::Indicators;
            Some(format!("{} indicators", app.indicator_rows.len()))
        }),
    };

    match outcome {
        Ok(message) => {
            let message = message.unwrap_or_else(|| "Done".to_string());
            if save_machine
                .process_event(&SaveEvent::Success(message), app)
                .is_err()
            {
                // Non-fatal state transition error
            }
            // A successful write changes the chart data; refetch it.
            if matches!(request, PendingRequest::SaveObservation(_)) {
                match actions.fetch_observations().await {
                    Ok(rows) => app.load_observations(rows, Instant::now()),
                    Err(e) => {
                        app.status_message = format!("Saved, but reload failed: {e}");
                    }
                }
            }
        }
        Err(e) => {
            if save_machine
                .process_event(&SaveEvent::Error(format!("{e}")), app)
                .is_err()
            {
                // Non-fatal state transition error
            }
        }
    }

    if save_machine.process_event(&SaveEvent::Reset, app).is_err() {
        // Non-fatal reset error
    }

    // Force a redraw to show the updated state
    if terminal.draw(|f| ui::ui(app, f)).is_err() {
        // Non-fatal redraw error
    }
}
