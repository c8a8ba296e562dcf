use clap::Parser;
use color_eyre::Result;
use scorecard_tui::app::{App, AppActions};
use scorecard_tui::cli::CliArgs;
use scorecard_tui::config::AppConfig;
use scorecard_tui::{event, terminal};
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = AppConfig::from_env();
    let actions = AppActions::new(&config)?;

    if config.debug {
        eprintln!("Backend base URL: {}", actions.api_url());
    }

    // Headless mode prints dataset stats and exits; also used when stdout
    // is not a terminal (pipes, CI).
    if args.headless || !is_terminal() {
        return event::run_headless(&actions, args.json).await;
    }

    // Initialize application state
    let mut app = App::new();
    match actions.fetch_observations().await {
        Ok(rows) => app.load_observations(rows, Instant::now()),
        Err(e) => {
            eprintln!("Error loading observations: {e}");
            eprintln!("Will continue with limited functionality");
            app.status_message = "No data loaded. Press r to retry.".to_string();
        }
    }

    // Setup terminal
    let mut terminal = terminal::setup()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app, &actions).await;

    // Restore terminal
    terminal::cleanup(true, true);

    // Return the result
    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
